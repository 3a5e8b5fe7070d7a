//! Query plan executor
//!
//! Consumes a resolved plan and a resident table and produces a
//! deterministic [`ResultEnvelope`].
//!
//! # Execution Flow
//!
//! 1. Resolve the plan's `op` and the fields it needs
//! 2. Apply the row filter, when the operation takes one
//! 3. Compute the answer over the filtered view
//! 4. Wrap the answer, or the failure, in an envelope
//!
//! # Guarantees
//!
//! - The source table is never mutated
//! - Identical inputs give byte-identical serialized envelopes
//! - No error or panic crosses [`execute`]

mod aggregate;
mod compare;
mod count;
mod dispatcher;
mod errors;
mod functions;
mod percentage;
mod result;

pub use dispatcher::{execute, execute_json};
pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use functions::AggFunc;
pub use result::{Answer, Measures, ResultEnvelope};
