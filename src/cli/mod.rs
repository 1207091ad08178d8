//! Command-line parsing and completion output

pub mod args;
pub mod output;
