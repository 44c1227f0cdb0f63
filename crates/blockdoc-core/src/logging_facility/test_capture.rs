//! In-memory event capture for logging assertions
//!
//! Integration tests share one global capture and run in parallel, so the
//! query helpers always narrow by op name, block id or field.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use blockdoc_core_types::schema::{FIELD_BLOCK_ID, FIELD_COMPONENT, FIELD_EVENT, FIELD_OP};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event, with every field rendered to a string
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Default)]
struct FieldVisitor(HashMap<String, String>);

impl Visit for FieldVisitor {
    // Integers and bools render identically through Debug.
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let fields = visitor.0;

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            component: fields.get(FIELD_COMPONENT).cloned(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

/// Shared handle onto the captured events
#[derive(Clone)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    /// Snapshot of every event captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op.as_deref() == Some(op))
            .collect()
    }

    /// Lifecycle event names (`start`, `end`, `end_error`) that `op` logged
    /// for `block_id`, in emission order
    pub fn lifecycle(&self, op: &str, block_id: &str) -> Vec<String> {
        self.events_for_op(op)
            .into_iter()
            .filter(|e| e.field(FIELD_BLOCK_ID) == Some(block_id))
            .filter_map(|e| e.event)
            .collect()
    }

    /// Values recorded under `field` by debug-level bookkeeping events
    pub fn debug_values(&self, field: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level == Level::DEBUG)
            .filter_map(|e| e.fields.get(field).cloned())
            .collect()
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture as the global subscriber on first call
///
/// Debug events are kept, so propagation bookkeeping is observable.
///
/// ```
/// use blockdoc_core::logging_facility::test_capture::init_test_capture;
/// use blockdoc_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_example_op", block_id = "b1");
/// assert_eq!(capture.lifecycle("doc_example_op", "b1"), vec!["start"]);
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let events = Arc::new(Mutex::new(Vec::new()));
            let layer = CaptureLayer {
                events: Arc::clone(&events),
            };
            // Another subscriber may already own the global slot; the capture
            // then simply records nothing.
            let _ = tracing_subscriber::registry().with(layer).try_init();
            TestCapture { events }
        })
        .clone()
}
