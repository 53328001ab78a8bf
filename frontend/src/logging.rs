use tracing::{Event, Subscriber};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, EnvFilter, Layer, Registry};

const DEFAULT_FILTER: &str = "warn,roulette_frontend=info,roulette_shared=info";

#[derive(Default)]
struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.push_str(&format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        }
    }
}

/// One line per event on stderr, keeping stdout for the game itself.
struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if visitor.0.is_empty() {
            return;
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let marker = match metadata.level().as_str() {
            "ERROR" => "❌ Error:",
            "WARN" => "⚠️ Warning:",
            "INFO" => "ℹ️",
            "DEBUG" => "🔄",
            _ => "·",
        };
        eprintln!("[{}] {} {} - {}", timestamp, marker, metadata.target(), visitor.0);
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter;
/// `log` records from the shared crate are forwarded too.
pub fn setup() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = Registry::default()
        .with(env_filter)
        .with(ConsoleLayer)
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to set subscriber: {}", e);
    }
}
