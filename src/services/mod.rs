//! Pipeline stages: scan, merge, contents, sheet projection, and report sinks

pub mod merge;
pub mod scan;
pub mod sink;
pub mod table;
pub mod toc;
