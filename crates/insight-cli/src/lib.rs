//! CLI library components for the pathology insights tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
