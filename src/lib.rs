//! Buildsage — fetch Azure DevOps build logs and ask an AI provider what
//! went wrong.
//!
//! The binary entry point is `src/main.rs`; the library root exposes
//! internals for integration tests.

pub mod agent;
pub mod azure;
pub mod config;
pub mod error;
pub mod llm;
pub mod logger;
pub mod server;
