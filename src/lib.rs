//! tableqa - ask questions about tabular datasets
//!
//! A question is translated into a JSON query plan, and the plan is run by a
//! deterministic executor over a CSV or SQLite table.

pub mod api;
pub mod cli;
pub mod executor;
pub mod filter;
pub mod http_server;
pub mod observability;
pub mod plan;
pub mod table;
pub mod translator;
