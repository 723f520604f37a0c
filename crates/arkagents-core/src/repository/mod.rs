//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (arkagents-infra) implements. The core crate never depends on any
//! specific storage technology. [`in_memory::InMemoryStore`] is the volatile
//! backend used by tests and by `--in-memory` runs.

pub mod agent;
pub mod in_memory;
pub mod message;
