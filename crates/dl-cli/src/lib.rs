//! Duty log CLI library.
//!
//! This crate provides the command-line interface for planning trips and
//! rendering duty-status log sheets.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
