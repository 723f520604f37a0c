//! Observability setup for ArkAgents: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
