#![forbid(unsafe_code)]

//! Command-script front end.
//!
//! Parses line-oriented command files and replays them against a
//! [`crate::db::RelationalStore`], rendering the results as text or JSON.

/// Script parsing and execution.
pub mod script;

pub use script::{
    parse_line, parse_script, read_script, Command, Event, OutputFormat, PrintTarget, RunSummary,
    ScriptError, ScriptRunner,
};
