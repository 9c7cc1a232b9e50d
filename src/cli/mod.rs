//! CLI module - argument parsing, prompts and the convert subcommand

mod args;
pub mod convert;
mod prompts;

pub use args::{Cli, Commands};
pub use prompts::*;
