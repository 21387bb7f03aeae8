//! Application layer modules
//!
//! Organizes the CLI interface, configuration loading, command sessions
//! and the command handlers that drive the library engine.

pub mod cli;
pub mod commands;
pub mod config;
pub mod env;
pub mod loader;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod session_mocks;

// Re-export main types for convenience
pub use cli::{AddArgs, Cli, CliConfig, Commands, EditArgs};
pub use commands::{execute_command, execute_command_with_session};
pub use config::AppConfig;
pub use session::{
    ClockProvider, CommandSession, ConfigProvider, InteractiveProvider, Session,
};
