//! In-memory adapters for tests and local development.

mod clock;
mod logger;
mod source;
mod transport;

pub use clock::ManualClock;
pub use logger::{LogEntry, LogLevel, RecordingLogger};
pub use source::InMemoryCommandSource;
pub use transport::{RecordingTransport, SentReply};
