//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    ConfigLoaded,

    // Datasets
    /// Upload or file parsed into a table
    DatasetLoaded,
    /// Upload or file refused
    DatasetRejected,

    // Plans
    PlanTranslated,
    PlanExecuted,
    /// Handler error recovered into an envelope
    PlanFailed,
    /// Handler panic caught at the dispatch boundary
    PlanPanicked,
    PlanClarify,
    PlanUnsupported,

    // Server
    ServerStart,
    AskReceived,
    AskAnswered,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DatasetLoaded => "DATASET_LOADED",
            Event::DatasetRejected => "DATASET_REJECTED",
            Event::PlanTranslated => "PLAN_TRANSLATED",
            Event::PlanExecuted => "PLAN_EXECUTED",
            Event::PlanFailed => "PLAN_FAILED",
            Event::PlanPanicked => "PLAN_PANICKED",
            Event::PlanClarify => "PLAN_CLARIFY",
            Event::PlanUnsupported => "PLAN_UNSUPPORTED",
            Event::ServerStart => "SERVER_START",
            Event::AskReceived => "ASK_RECEIVED",
            Event::AskAnswered => "ASK_ANSWERED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::PlanFailed | Event::DatasetRejected | Event::PlanUnsupported => Severity::Warn,
            Event::PlanPanicked => Severity::Error,
            Event::PlanTranslated => Severity::Debug,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
