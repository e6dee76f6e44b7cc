//! Adapter implementations for command dispatch ports.

pub mod manifest;
pub mod memory;
pub mod template;
pub mod tracing_logger;

pub use manifest::{HandlerCatalogue, ManifestCommandSource};
pub use template::{TemplateError, TemplateReplyHook};
pub use tracing_logger::TracingLogger;
