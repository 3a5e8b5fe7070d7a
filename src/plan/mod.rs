//! Query plans
//!
//! A plan is the structured instruction an upstream translator derives from a
//! question. Plans are untrusted input: a [`QueryPlan`] keeps the JSON it was
//! given verbatim and only validates the fields its `op` needs, when it is
//! resolved into an [`Operation`]. Fields irrelevant to the op are ignored.

mod errors;
mod extract;
mod query_plan;

pub use errors::{PlanError, PlanResult};
pub use extract::extract_plan;
pub use query_plan::{AggregationSpec, Operation, QueryPlan, DEFAULT_CLARIFY_QUESTION};
