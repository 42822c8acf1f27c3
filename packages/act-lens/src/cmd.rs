//! Subcommands of the `act-lens` binary.

pub mod config;
pub mod parse;
pub mod run;
pub mod workflows;

mod ui;
