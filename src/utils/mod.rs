//! Utility functions shared by the builder, the packer and the CLI.
//!
//! ## Modules
//!
//! - [`config`] - Application configuration (platform config directory)
//! - [`encoding`] - Bijective base-36 reference codes
//! - [`progress`] - Progress bars, no-op without the `progress` feature
//! - [`tokenizer`] - Word source normalization
//!
//! ## Key Functions
//!
//! ```
//! use packtrie::utils::{extract_words, from_alpha_code, to_alpha_code};
//!
//! assert_eq!(extract_words("Don't stop"), vec!["don", "stop", "t"]);
//! assert_eq!(to_alpha_code(36), "00");
//! assert_eq!(from_alpha_code("ZZ"), Some(1331));
//! ```

pub mod config;
pub mod encoding;
pub mod progress;
pub mod tokenizer;

pub use config::*;
pub use encoding::*;
pub use tokenizer::*;
