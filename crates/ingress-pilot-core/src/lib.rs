//! Core domain model for ingress-pilot
//!
//! UI-independent: the orchestrator drives kubectl invocations and hands
//! rendered documents to whatever sink the frontend provides.

pub mod orchestrator;
pub mod types;

pub use orchestrator::{DocumentSink, HostFailure, Orchestrator, Outcome};
pub use types::{ActionKind, CommandTarget, Document};
