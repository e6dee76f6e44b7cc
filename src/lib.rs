//! Herald: command dispatch and rate limiting for chat bots.
//!
//! This crate turns inbound chat messages into command invocations,
//! enforcing admin-only access and per-user, per-channel, and per-guild
//! cooldowns before any handler runs.
//!
//! # Architecture
//!
//! Herald follows hexagonal architecture principles:
//!
//! - **Domain**: Command metadata, cooldown tracking, and failure types
//! - **Ports**: Abstract trait interfaces for the gateway, logging, and
//!   command discovery
//! - **Adapters**: Concrete implementations of ports (manifest files,
//!   in-memory test doubles, `tracing`)
//!
//! # Modules
//!
//! - [`command`]: Commands, the registry with atomic reload, and the
//!   message dispatcher
//! - [`config`]: Bot options loaded from JSON
//! - [`logging`]: `tracing` subscriber installation

pub mod command;
pub mod config;
pub mod logging;
