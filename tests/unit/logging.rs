//! Tests for the structured log events emitted by the workflows.

use std::sync::{Arc, Mutex};

use liftstat::{conversion, revenue, Conversions, MeanSample};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};

/// Records the target of every event it sees.
#[derive(Clone, Default)]
struct EventTargets(Arc<Mutex<Vec<String>>>);

impl EventTargets {
    fn seen(&self, target: &str) -> bool {
        self.0.lock().unwrap().iter().any(|t| t == target)
    }
}

impl Subscriber for EventTargets {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }
    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }
    fn record(&self, _: &Id, _: &Record<'_>) {}
    fn record_follows_from(&self, _: &Id, _: &Id) {}
    fn event(&self, event: &Event<'_>) {
        self.0.lock().unwrap().push(event.metadata().target().to_string());
    }
    fn enter(&self, _: &Id) {}
    fn exit(&self, _: &Id) {}
}

#[test]
fn conversion_workflow_emits_debug_events() {
    let targets = EventTargets::default();
    tracing::subscriber::with_default(targets.clone(), || {
        conversion::sample_size(5.0, 10.0, 95.0, 80.0).unwrap();
        conversion::analyze(Conversions::new(500, 10_000), Conversions::new(600, 10_000), 95.0)
            .unwrap();
    });
    assert!(targets.seen("liftstat::conversion"));
    assert!(targets.seen("liftstat_core::planning::sample_size"));
}

#[test]
fn revenue_workflow_emits_debug_events() {
    let targets = EventTargets::default();
    tracing::subscriber::with_default(targets.clone(), || {
        revenue::sample_size(50.0, 15.0, 5.0, 95.0, 80.0).unwrap();
        revenue::analyze(MeanSample::new(50.0, 15.0, 500), MeanSample::new(52.0, 15.0, 500), 95.0)
            .unwrap();
    });
    assert!(targets.seen("liftstat::revenue"));
}
