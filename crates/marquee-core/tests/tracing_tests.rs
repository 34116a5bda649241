#![forbid(unsafe_code)]

//! Structured logging integration tests.
//!
//! Verifies that state transitions and rejected operations emit tracing
//! events with the expected levels and fields:
//!   cargo test -p marquee-core --test tracing_tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use marquee_core::{
    FlagTarget, ManualClock, ModalPresenter, Project, TimingConfig, TypewriterEngine,
};
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured event with its level, message, and fields.
#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

/// A tracing Layer that records every event.
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Visitor that extracts event fields.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

/// Run `f` with an event-capturing subscriber installed.
fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn no_jitter() -> TimingConfig {
    TimingConfig {
        type_jitter_ms: 0.0,
        pause_ms: 100.0,
        ..TimingConfig::default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn typewriter_logs_each_mode_transition() {
    let events = with_captured_events(|| {
        let mut engine = TypewriterEngine::new(["a"], &no_jitter()).unwrap();
        for t in (0..=300).step_by(10) {
            engine.tick(ms(t));
        }
    });

    let messages: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::DEBUG)
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec!["typewriter paused", "typewriter deleting", "typewriter typing"]
    );
    assert_eq!(events[0].fields.get("phrase_index").map(String::as_str), Some("0"));
}

#[test]
fn slow_delete_interval_warns_once() {
    let events = with_captured_events(|| {
        let timing = TimingConfig {
            type_interval_ms: 40.0,
            delete_interval_ms: 60.0,
            ..no_jitter()
        };
        TypewriterEngine::new(["x"], &timing).unwrap();
    });

    let warnings: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("delete interval"));
}

#[test]
fn out_of_range_open_warns_with_index_and_len() {
    let events = with_captured_events(|| {
        let mut modal = ModalPresenter::new(
            vec![Project::default(); 2],
            ms(300),
            ManualClock::new(),
            FlagTarget::new(),
        );
        assert!(modal.open(5).is_err());
    });

    let warning = events
        .iter()
        .find(|e| e.level == tracing::Level::WARN)
        .expect("warning emitted");
    assert_eq!(warning.fields.get("index").map(String::as_str), Some("5"));
    assert_eq!(warning.fields.get("len").map(String::as_str), Some("2"));
}

#[test]
fn modal_lifecycle_logs_phases_and_lock() {
    let events = with_captured_events(|| {
        let clock = ManualClock::new();
        let mut modal =
            ModalPresenter::new(vec![Project::default()], ms(300), clock.clone(), FlagTarget::new());
        modal.open(0).unwrap();
        modal.paint();
        modal.close();
        clock.set(ms(300));
        modal.tick();
    });

    let transitions: Vec<_> = events
        .iter()
        .filter(|e| e.message == "modal phase")
        .map(|e| {
            (
                e.fields.get("from").cloned().unwrap_or_default(),
                e.fields.get("to").cloned().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            ("closed".to_string(), "opening".to_string()),
            ("opening".to_string(), "open".to_string()),
            ("open".to_string(), "closing".to_string()),
            ("closing".to_string(), "closed".to_string()),
        ]
    );
    assert!(events.iter().any(|e| e.message == "scroll lock engaged"));
    assert!(events.iter().any(|e| e.message == "scroll lock released"));
    assert!(events.iter().any(|e| e.message == "close scheduled"));
}

#[test]
fn close_schedule_logs_exact_delay() {
    let events = with_captured_events(|| {
        let clock = ManualClock::new();
        let mut modal = ModalPresenter::new(
            vec![Project::default()],
            Duration::from_micros(300_500),
            clock,
            FlagTarget::new(),
        );
        modal.open(0).unwrap();
        modal.close();
    });

    let scheduled = events
        .iter()
        .find(|e| e.message == "close scheduled")
        .expect("close scheduled event");
    assert_eq!(scheduled.level, tracing::Level::DEBUG);
    assert_eq!(
        scheduled.fields.get("delay").map(String::as_str),
        Some("300.5ms")
    );
}
