//! Interactive menu, admin session and configuration
//!
//! This crate provides the `eventdesk` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod menu;
pub mod session;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use menu::{LoginMode, Menu};
pub use session::Role;
