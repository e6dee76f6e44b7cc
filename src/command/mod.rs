//! Command dispatch and rate limiting for Herald.
//!
//! Inbound chat messages are matched against a registry of commands by
//! alias. Each command enforces its admin gate and per-scope cooldowns
//! before running, and routes policy failures to recovery hooks. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Built-in `ping`, `reload` and `shutdown` commands in [`builtin`]

pub mod adapters;
pub mod builtin;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
