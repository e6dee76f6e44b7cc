//! Domain model for command dispatch.
//!
//! Commands are described by declarative metadata which is validated into a
//! [`CommandSpec`] before anything can run. Policy failures are plain data
//! ([`CommandFailure`]) and cooldown state lives in per-scope
//! [`CooldownTracker`]s. No transport or storage concerns cross this
//! boundary.

mod alias;
mod capability;
mod cooldown;
mod error;
mod failure;
mod message;
mod metadata;
mod options;
mod scope;

pub use alias::AliasSet;
pub use capability::{Capability, CapabilitySet};
pub use cooldown::{CooldownDecision, CooldownPolicy, CooldownTracker, SharedClock};
pub use error::CommandValidationError;
pub use failure::{CommandFailure, CooldownFailure, HookKind};
pub use message::{InboundMessage, Invocation};
pub use metadata::{CommandMetadata, CommandSpec, CooldownSettings};
pub use options::CommandOptions;
pub use scope::ScopeKind;
