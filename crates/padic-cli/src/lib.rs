pub mod commands;
pub mod config;
pub mod logging;

pub use commands::BinaryOp;
pub use config::{CliConfig, DisplayConfig, LoggingConfig, DEFAULT_CONFIG_FILE};
