//! Tracing initialization and the debug-channel log relay.
//!
//! Log events go to three sinks: stderr, a daily-rolling file under
//! `logs/`, and (warn level and above) a channel relay that forwards
//! formatted lines to the configured Discord debug channels once the
//! gateway is up.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Utc;
use serenity::http::Http;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{warn, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use dotma_common::{format_timestamp, truncate_string};
use dotma_config::ConfigCache;

/// Upper bound on a relayed line; Discord rejects longer messages.
const MAX_RELAY_LEN: usize = 1900;

/// Keeps the non-blocking file writer alive for the process lifetime.
pub struct LogGuard {
    _file: tracing_appender::non_blocking::WorkerGuard,
}

/// Initializes the tracing stack.
///
/// Returns the guard that must be held until shutdown and the receiver
/// end of the warn-level relay, to be wired to the gateway once the
/// client is connected.
pub fn init() -> (LogGuard, mpsc::UnboundedReceiver<String>) {
    let file_appender = tracing_appender::rolling::daily("logs", "dotma-bot.log");
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);

    let (relay_tx, relay_rx) = mpsc::unbounded_channel();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dotma_bot=debug,dotma_dispatch=debug,serenity=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .with(DebugChannelLayer { tx: relay_tx })
        .init();

    (LogGuard { _file: file_guard }, relay_rx)
}

/// Forwards relayed log lines to the configured debug channels.
///
/// Lines produced before the gateway is up sit in the channel buffer
/// and drain on the first iteration.
pub async fn run_debug_relay(
    http: Arc<Http>,
    config: Arc<ConfigCache>,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    while let Some(line) = rx.recv().await {
        let line = truncate_string(&line, MAX_RELAY_LEN);
        // Re-read per line so a config reload retargets the relay.
        for channel in &config.get().discord.debug_channels {
            let target = serenity::model::id::ChannelId::new(channel.0);
            if let Err(err) = target.say(&http, &line).await {
                // eprintln, not warn: a warn here would loop back
                // through this relay.
                eprintln!("debug relay failed for channel {channel}: {err}");
            }
        }
    }
    warn!("Debug relay channel closed");
}

/// Layer that captures warn-and-above events for the channel relay.
struct DebugChannelLayer {
    tx: mpsc::UnboundedSender<String>,
}

impl<S: Subscriber> Layer<S> for DebugChannelLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > Level::WARN || meta.target().starts_with("serenity") {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let line = format!(
            "[{}] `{}` **{}**: {}{}",
            format_timestamp(Utc::now()),
            meta.target(),
            meta.level(),
            visitor.message,
            visitor.fields
        );
        // A closed receiver just means the relay shut down first.
        let _ = self.tx.send(line);
    }
}

/// Collects an event's fields into one display line, message first.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}
