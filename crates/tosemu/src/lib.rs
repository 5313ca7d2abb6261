//! Text reports for the `tosemu` command line tool.

pub mod report;
