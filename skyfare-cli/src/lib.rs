pub mod app_config;
pub mod commands;

pub use app_config::Config;
pub use commands::{execute, Cli, Report};
