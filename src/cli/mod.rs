//! CLI module for toolchanger - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
