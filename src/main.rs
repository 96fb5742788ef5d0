use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use packtrie::index::{build_pack_file, pack_text, stats::show_stats, PackedTrie};
use packtrie::output;
use packtrie::utils::{extract_words, normalize_word, AppConfig};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use termcolor::{ColorChoice, StandardStream};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "packtrie")]
#[command(about = "Build and query packed DAWG word dictionaries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to config.json in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a packed dictionary from a word source file
    Pack {
        /// Word source (any non-letter separates words)
        input: PathBuf,

        /// Output file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum references before a node may get a symbol
        #[arg(long)]
        min_refs: Option<u32>,

        /// Maximum symbol table size (0 disables symbols)
        #[arg(long)]
        max_symbols: Option<usize>,

        /// No progress output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Look up words
    Lookup {
        packed: PathBuf,

        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Verify that every word of a word list is in the dictionary
    Check {
        packed: PathBuf,
        wordlist: PathBuf,
    },
    /// Show the dictionary words that are prefixes of a word
    Match { packed: PathBuf, word: String },
    /// List words in a range
    Words {
        packed: PathBuf,

        /// First word (inclusive)
        #[arg(long, default_value = "")]
        from: String,

        /// Upper bound (exclusive); defaults to every word starting with --from
        #[arg(long)]
        beyond: Option<String>,

        /// Maximum number of words (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show pack statistics
    Stats {
        packed: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    debug!(?config, "loaded config");

    let choice = match cli.color {
        ColorMode::Auto => ColorChoice::Auto,
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
    };
    let mut stdout = StandardStream::stdout(choice);

    match cli.command {
        Commands::Pack {
            input,
            output,
            min_refs,
            max_symbols,
            quiet,
        } => {
            let mut pack_config = config.pack.clone();
            if let Some(min_refs) = min_refs {
                pack_config.symbol_min_refs = min_refs;
            }
            if let Some(max_symbols) = max_symbols {
                pack_config.max_symbols = max_symbols;
            }

            match output {
                Some(output) => {
                    build_pack_file(&input, &output, &pack_config, quiet)?;
                }
                None => {
                    let text = std::fs::read_to_string(&input)
                        .with_context(|| format!("Failed to read word source {}", input.display()))?;
                    let (packed, _) = pack_text(&text, &pack_config);
                    println!("{}", packed);
                }
            }
        }
        Commands::Lookup { packed, words } => {
            let trie = PackedTrie::open(&packed)?;
            let results: Vec<(&str, bool)> = words
                .iter()
                .map(|word| (word.as_str(), trie.is_word(&normalize_word(word))))
                .collect();
            output::print_lookups(&mut stdout, &results)?;
        }
        Commands::Check { packed, wordlist } => {
            let trie = PackedTrie::open(&packed)?;
            let (checked, missing) = check_wordlist(&trie, &wordlist, config.effective_threads())?;
            output::print_check_summary(&mut stdout, checked, &missing)?;
            if !missing.is_empty() {
                stdout.flush()?;
                std::process::exit(1);
            }
        }
        Commands::Match { packed, word } => {
            let trie = PackedTrie::open(&packed)?;
            let word = normalize_word(&word);
            let matches = trie.matches(&word);
            output::print_matches(&mut stdout, &word, &matches)?;
        }
        Commands::Words {
            packed,
            from,
            beyond,
            limit,
        } => {
            let trie = PackedTrie::open(&packed)?;
            let from = normalize_word(&from);
            // Bounds may be sentinels past 'z', so only the case is folded
            let beyond = beyond.map(|b| b.to_ascii_lowercase());
            let limit = limit.unwrap_or(config.default_limit);
            let words = trie.words(&from, beyond.as_deref(), Some(limit));
            output::print_words(&mut stdout, &words)?;
        }
        Commands::Stats { packed, json } => {
            show_stats(&packed, json)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) -> Result<()> {
    let default = match verbose {
        0 => "packtrie=warn",
        1 => "packtrie=debug",
        _ => "packtrie=trace",
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default).context("Invalid log filter")?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Check every normalized word of `wordlist` in parallel.
/// Returns the number of words checked and the missing ones in order.
fn check_wordlist(
    trie: &PackedTrie,
    wordlist: &Path,
    threads: usize,
) -> Result<(usize, Vec<String>)> {
    let text = std::fs::read_to_string(wordlist)
        .with_context(|| format!("Failed to read word list {}", wordlist.display()))?;
    let words = extract_words(&text);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to start worker threads")?;
    let missing: Vec<String> = pool.install(|| {
        words
            .par_iter()
            .filter(|word| !trie.is_word(word))
            .cloned()
            .collect()
    });

    debug!(checked = words.len(), missing = missing.len(), threads, "checked word list");
    Ok((words.len(), missing))
}
