//! Infrastructure implementations for ArkAgents.
//!
//! Provides the concrete implementations of the repository traits defined in
//! `arkagents-core` (SQLite), the OpenAI-compatible completion provider, and
//! config file loading.

pub mod config;
pub mod llm;
pub mod sqlite;
