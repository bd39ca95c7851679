pub mod commands;
pub mod config;
pub mod tracing_setup;

pub use commands::{handle_command, CliCommand};
pub use config::CliConfig;
pub use tracing_setup::init_tracing;
