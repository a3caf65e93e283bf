//! Tests for the debug run report emitted through `tracing`.

use pretty_assertions::assert_eq;
use std::fmt;
use std::sync::{Arc, Mutex};
use stimpl_eval::{run_captured, EvalConfig};
use stimpl_types::Expr;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// One recorded event: its message and its other fields as `name=value`.
#[derive(Debug, Clone, Default)]
struct Recorded {
    message: String,
    fields: Vec<String>,
}

impl Visit for Recorded {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }
}

/// Layer that keeps every event it sees.
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Recorded>>>);

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorded = Recorded::default();
        event.record(&mut recorded);
        self.0.lock().unwrap().push(recorded);
    }
}

/// Run `program` with `config` under a recording subscriber.
fn record(program: &Expr, config: &EvalConfig) -> Vec<Recorded> {
    let recorder = Recorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());
    tracing::subscriber::with_default(subscriber, || {
        run_captured(program, config).expect("evaluation failed");
    });
    let events = recorder.0.lock().unwrap().clone();
    events
}

fn find<'a>(events: &'a [Recorded], message: &str) -> Option<&'a Recorded> {
    events.iter().find(|e| e.message == message)
}

fn program() -> Expr {
    Expr::program([
        Expr::assign("x", Expr::int(1)),
        Expr::assign("s", Expr::string("hi")),
    ])
}

// ══════════════════════════════════════════════════════════════════════════════
// Report contents
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn debug_run_reports_program_value_and_state() {
    let events = record(&program(), &EvalConfig::default().with_debug(true));

    let prog = find(&events, "program").expect("no program event");
    assert_eq!(
        prog.fields,
        vec![r#"program=Program(Assign(x, IntLiteral(1)), Assign(s, StringLiteral("hi")))"#]
    );

    let value = find(&events, "final_value").expect("no final_value event");
    assert_eq!(value.fields, vec!["value=hi", "ty=String"]);

    let state = find(&events, "final_state").expect("no final_state event");
    assert_eq!(
        state.fields,
        vec!["state=s: (hi, String), x: (1, Integer)", "gas=5"]
    );
}

#[test]
fn report_events_follow_run_order() {
    let events = record(&program(), &EvalConfig::default().with_debug(true));
    let order: Vec<&str> = events
        .iter()
        .map(|e| e.message.as_str())
        .filter(|m| matches!(*m, "program" | "final_value" | "final_state"))
        .collect();
    assert_eq!(order, vec!["program", "final_value", "final_state"]);
}

#[test]
fn no_report_without_debug() {
    let events = record(&program(), &EvalConfig::default());
    assert!(find(&events, "program").is_none());
    assert!(find(&events, "final_value").is_none());
    assert!(find(&events, "final_state").is_none());
}

#[test]
fn assignments_are_traced() {
    let events = record(&program(), &EvalConfig::default());
    let assigns: Vec<&Recorded> = events.iter().filter(|e| e.message == "assign").collect();
    assert_eq!(assigns.len(), 2);
    assert_eq!(assigns[0].fields, vec!["variable=\"x\"", "value=1"]);
}
