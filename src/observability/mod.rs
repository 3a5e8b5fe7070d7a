//! Observability
//!
//! Structured JSON logging of typed events.
//!
//! 1. Observability is read-only: nothing logged changes a result
//! 2. Output is deterministic for identical inputs
//!
//! ```ignore
//! use tableqa::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::PlanExecuted, &[("op", "count")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
