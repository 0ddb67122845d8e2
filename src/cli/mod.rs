//! CLI command handlers
//!
//! Each subcommand is implemented in its own module. Handlers build the
//! collaborators from configuration, drive the orchestrator and print.

pub mod analyze;
pub mod dashboard;
pub mod delete;
pub mod helpers;
pub mod identity;
