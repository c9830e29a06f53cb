//! `ocldm` command line client
//!
//! Configuration, logging, argument parsing and subcommands for managing OCL
//! dictionaries from a terminal.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod render;

pub use cli::{Cli, Command};
pub use config::Config;
