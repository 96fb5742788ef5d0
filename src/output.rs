//! Terminal output for lookup, match and enumeration results

use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Print one line per looked-up word: `found` or `missing`, then the word
pub fn print_lookups<W: WriteColor>(out: &mut W, results: &[(&str, bool)]) -> io::Result<()> {
    for &(word, found) in results {
        if found {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            write!(out, "found  ")?;
        } else {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "missing")?;
        }
        out.reset()?;
        writeln!(out, " {}", word)?;
    }
    Ok(())
}

/// Print the longest match highlighted inside `word`, then every match
pub fn print_matches<W: WriteColor>(out: &mut W, word: &str, matches: &[&str]) -> io::Result<()> {
    let longest = matches.last().copied().unwrap_or("");
    if longest.is_empty() {
        writeln!(out, "{}: no match", word)?;
        return Ok(());
    }

    // Highlight the matched prefix
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "{}", longest)?;
    out.reset()?;
    writeln!(out, "{}", &word[longest.len()..])?;

    for m in matches {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{:>4}", m.len())?;
        out.reset()?;
        writeln!(out, " {}", m)?;
    }
    Ok(())
}

/// Print enumerated words, one per line
pub fn print_words<W: Write>(out: &mut W, words: &[String]) -> io::Result<()> {
    for word in words {
        writeln!(out, "{}", word)?;
    }
    Ok(())
}

/// Print the outcome of a word list check
pub fn print_check_summary<W: WriteColor>(
    out: &mut W,
    checked: usize,
    missing: &[String],
) -> io::Result<()> {
    for word in missing {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        write!(out, "missing")?;
        out.reset()?;
        writeln!(out, " {}", word)?;
    }

    let color = if missing.is_empty() {
        Color::Green
    } else {
        Color::Yellow
    };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}/{}", checked - missing.len(), checked)?;
    out.reset()?;
    writeln!(out, " words found")?;
    Ok(())
}
