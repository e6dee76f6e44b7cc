//! Port contracts for command dispatch.
//!
//! Ports define the collaborator interfaces the engine consumes: the
//! gateway transport, the logger, the command source, and the handler and
//! hook callbacks supplied by command authors.

pub mod context;
pub mod handler;
pub mod logger;
pub mod registry;
pub mod source;
pub mod transport;

pub use context::{CapabilityError, Collaborators, CommandContext};
pub use handler::{
    CommandHandler, FailureHook, FnHandler, FnHook, HandlerError, HandlerResult, handler_fn,
    hook_fn,
};
pub use logger::BotLogger;
pub use registry::{RegistryControl, RegistryHandle, ReloadError, ReloadResult, ReloadSummary};
pub use source::{CommandDefinition, CommandHooks, CommandSource, DiscoveryError, DiscoveryResult};
pub use transport::{Transport, TransportError, TransportResult};

#[cfg(test)]
pub use transport::MockTransport;
