//! Command-line front end for attendance rosters.
//!
//! The binary is a thin wrapper around [`commands::run`]; everything else is
//! exposed so the commands and the interactive shell can be driven from tests
//! with an in-memory store.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;
pub mod shell;
pub mod sink;
pub mod summary;
