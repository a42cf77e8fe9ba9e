//! CLI library components for the mapping suggester.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
