//! Main library for act-lens, used by its CLI.
//!
//! The pipeline is: run `act` ([`runner`]), classify the captured log
//! ([`parse`]), optionally pull source context ([`context`]), render Markdown
//! ([`report`]), then hand the report off ([`store`], [`clipboard`]).

pub mod clipboard;
pub mod config;
pub mod context;
pub mod failure;
pub mod parse;
pub mod report;
pub mod runner;
pub mod store;
