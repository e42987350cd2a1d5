//! I/O helpers for lint runner commands.

pub mod config;
pub mod environment;
pub mod process;
pub mod tools;
