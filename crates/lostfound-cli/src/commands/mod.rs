//! Subcommand implementations.

pub mod create;
pub mod delete;
pub mod list;
pub mod serve;
pub mod set_status;
