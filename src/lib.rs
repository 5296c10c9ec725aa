//! Library entrypoint for prebuild-matrix.
//!
//! The primary interface is the `prebuild-matrix` binary. The modules are
//! exposed here so integration tests can drive them directly.

pub mod args;
pub mod command;
pub mod config;
pub mod matrix;
pub mod output;
pub mod runner;
