//! Application services for command execution, registry, and dispatch.

mod command;
mod dispatcher;
mod registry;

pub use command::{Command, ExecuteError, ExecuteOutcome};
pub use dispatcher::{DispatchOutcome, MessageDispatcher};
pub use registry::CommandRegistry;
