pub mod commands;
pub mod config;
pub mod error;
pub mod utils;

pub use commands::{run, Cli, Command};
pub use config::Config;
pub use error::CliError;
