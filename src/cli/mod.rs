// CLI module for mp3meta
//
// Command-line front end over the library: reports, frame listings and tag edits.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{Commands, Config, OutputFormat};
pub use output::OutputFormatter;
