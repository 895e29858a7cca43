//! NucleoTec CLI library.
//!
//! Configuration loading, argument parsing, command execution and output
//! formatting for the `nucleotec` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use commands::{Outcome, Session};
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
