//! Subcommands that run instead of the interactive menu.

pub mod config;
