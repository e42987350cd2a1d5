//! Deterministic, pure logic shared by the lint runner.
//!
//! Core modules must be free of I/O side effects. They build the plan and
//! interpret exit statuses, which keeps ordering and target rules testable
//! without spawning anything.

pub mod exit_status;
pub mod plan;
pub mod types;
