//! Library half of the `nc-check` binary.
//!
//! The binary only parses arguments, sets up logging and calls
//! [`run::execute`], so everything here can be driven from tests with an
//! in-memory writer.

pub mod cli;
pub mod config;
pub mod run;

pub use cli::{normalize_args, Cli, Command, CommonArgs};
pub use run::execute;
