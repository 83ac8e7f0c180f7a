//! Test support: a tracing layer that captures emitted events so tests can
//! assert on completion lines and their fields.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Clone, Debug)]
pub(crate) struct CapturedEvent {
    pub level: tracing::Level,
    pub message: String,
    pub fields: Value,
}

#[derive(Clone, Default)]
struct Capture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = Visitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct Visitor {
    message: String,
    fields: Value,
}

impl Visit for Visitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let text = format!("{value:?}");
        match field.name() {
            "message" => self.message = text,
            "fields" => self.fields = serde_json::from_str(&text).unwrap_or(Value::Null),
            _ => {}
        }
    }
}

/// Run `f` with a capturing subscriber installed for the current thread and
/// return whatever it produced along with the captured events.
pub(crate) fn collect<T>(f: impl FnOnce() -> T) -> (T, Vec<CapturedEvent>) {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    let events = capture.events.lock().unwrap().clone();
    (result, events)
}

/// The completion lines among `events`, in emission order.
pub(crate) fn completions(events: &[CapturedEvent]) -> Vec<&CapturedEvent> {
    events
        .iter()
        .filter(|e| e.message.starts_with("request completed"))
        .collect()
}
