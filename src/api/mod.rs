//! Question answering flow
//!
//! Orchestrates the subsystems for one question against one dataset:
//!
//! 1. Summarize the loaded table
//! 2. Translate the question into a plan
//! 3. Execute the plan
//! 4. Shape the wire response
//!
//! Shared by the `/ask` endpoint and the `ask` command.

mod handler;
mod response;

pub use handler::AskHandler;
pub use response::{AskResponse, DatasetInfo};
