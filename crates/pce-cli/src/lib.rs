//! Library components of the `pce` command-line tool.

pub mod logging;
