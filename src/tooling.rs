//! Tooling & Integration Layer
//!
//! Command-line access to a workspace registry.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
