//! Business logic and repository trait definitions for ArkAgents.
//!
//! This crate defines the "ports" (repository traits, completion provider
//! trait) that the infrastructure layer implements, plus the services built
//! on top of them. It depends only on `arkagents-types` -- never on
//! `arkagents-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;
