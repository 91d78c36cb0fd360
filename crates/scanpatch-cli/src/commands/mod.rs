//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod file;
pub mod process;
pub mod regions;
pub mod report;
