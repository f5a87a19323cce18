//! Command line front end: argument parsing and reporting.

pub(crate) mod cli;
