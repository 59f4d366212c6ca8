//! Command-line interface module.

mod args;
pub mod daemon;

pub use args::Cli;
