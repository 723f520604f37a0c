//! Chat turn handling: context assembly and the send-message orchestrator.

pub mod context;
pub mod service;
