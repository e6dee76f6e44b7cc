//! Runs Herald against a line-oriented console gateway.
//!
//! Usage:
//!
//! ```text
//! herald-console [config-dir] [author-id] [channel-id]
//! ```
//!
//! `config-dir` (default `.`) may hold a `herald.json` file deserializing to
//! [`BotOptions`]; when absent the defaults apply. The command manifest named
//! by `command_manifest` is read from the same directory on every reload, and
//! `log_file`, when set, is appended to alongside stderr.
//! Each stdin line is dispatched as a message from `author-id` (default
//! `console-user`) in `channel-id` (default `console`). Replies are written
//! to stdout. A representative configuration is:
//!
//! ```json
//! {
//!   "admin_ids": ["console-user"],
//!   "command_prefix": "!",
//!   "command_manifest": "commands.json",
//!   "log_filter": "herald=info",
//!   "log_file": "herald.log"
//! }
//! ```

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use herald::command::adapters::{ManifestCommandSource, TracingLogger};
use herald::command::builtin;
use herald::command::domain::{InboundMessage, SharedClock};
use herald::command::ports::{BotLogger, Transport, TransportError, TransportResult};
use herald::command::services::{CommandRegistry, MessageDispatcher};
use herald::config::BotOptions;
use herald::logging::{init_tracing, open_log_file};
use mockable::{Clock, DefaultClock};
use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::runtime::Builder;
use tokio::sync::Mutex;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

const CONFIG_FILE: &str = "herald.json";

struct ConsoleArgs {
    config_dir: String,
    author_id: String,
    channel_id: String,
}

impl ConsoleArgs {
    fn from_env() -> Self {
        let mut args = env::args().skip(1);
        Self {
            config_dir: args.next().unwrap_or_else(|| ".".to_owned()),
            author_id: args.next().unwrap_or_else(|| "console-user".to_owned()),
            channel_id: args.next().unwrap_or_else(|| "console".to_owned()),
        }
    }
}

/// Transport writing replies to stdout.
struct ConsoleTransport {
    stdout: Mutex<Stdout>,
    disconnected: AtomicBool,
}

impl ConsoleTransport {
    fn new() -> Self {
        Self {
            stdout: Mutex::new(tokio::io::stdout()),
            disconnected: AtomicBool::new(false),
        }
    }

    fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::Acquire)
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send_reply(&self, origin: &InboundMessage, content: &str) -> TransportResult<()> {
        if self.is_disconnected() {
            return Err(TransportError::Disconnected);
        }
        let line = format!("[#{}] {content}\n", origin.channel_id());
        let mut stdout = self.stdout.lock().await;
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(TransportError::delivery)?;
        stdout.flush().await.map_err(TransportError::delivery)
    }

    async fn disconnect(&self) -> TransportResult<()> {
        if self.disconnected.swap(true, Ordering::AcqRel) {
            return Err(TransportError::Disconnected);
        }
        Ok(())
    }
}

fn main() -> Result<(), BoxError> {
    let args = ConsoleArgs::from_env();
    let dir = Dir::open_ambient_dir(&args.config_dir, ambient_authority())?;
    let options = load_options(&dir)?;
    let log_file = options
        .log_file
        .as_deref()
        .map(|file| open_log_file(&dir, file))
        .transpose()?;
    init_tracing(&options.log_filter, log_file)?;
    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(run(args, options))
}

fn load_options(dir: &Dir) -> Result<BotOptions, BoxError> {
    if dir.exists(CONFIG_FILE) {
        Ok(BotOptions::load(dir, CONFIG_FILE)?)
    } else {
        Ok(BotOptions::default())
    }
}

async fn run(args: ConsoleArgs, options: BotOptions) -> Result<(), BoxError> {
    let console = Arc::new(ConsoleTransport::new());
    let transport: Arc<dyn Transport> = Arc::clone(&console) as Arc<dyn Transport>;
    let clock: SharedClock = Arc::new(DefaultClock);
    let logger: Arc<dyn BotLogger> = Arc::new(TracingLogger);

    let catalogue = builtin::catalogue(&transport, &clock)?;
    let source = ManifestCommandSource::open(
        &args.config_dir,
        options.command_manifest.clone(),
        catalogue,
    )?;
    let registry = CommandRegistry::new(
        Arc::new(source),
        transport,
        Arc::clone(&logger),
        options.command_options(),
        Arc::new(DefaultClock),
    );
    if let Ok(summary) = registry.reload().await {
        tracing::info!(commands = summary.commands, "console gateway ready");
    }

    let dispatcher = MessageDispatcher::new(registry, logger).with_prefix(options.command_prefix);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut sequence: u64 = 0;
    while !console.is_disconnected() {
        let Some(line) = lines.next_line().await? else {
            break;
        };
        sequence = sequence.saturating_add(1);
        let message = InboundMessage::new(
            format!("console-{sequence}"),
            args.author_id.as_str(),
            args.channel_id.as_str(),
            line,
            clock.utc(),
        );
        dispatcher.on_message(message).await;
    }
    Ok(())
}
