//! Shared domain types for ArkAgents.
//!
//! This crate contains the core domain types used across the ArkAgents backend:
//! Agent, ChatMessage, ConversationSummary, completion request/response shapes,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
