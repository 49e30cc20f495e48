//! Shared domain types for Parentline.
//!
//! This crate contains the data shapes used across the relay: session
//! snapshots, the two inbound/outbound wire formats, the avatar platform's
//! message envelope, LLM request/response types, configuration, and errors.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror, secrecy.

pub mod config;
pub mod envelope;
pub mod error;
pub mod llm;
pub mod protocol;
pub mod session;
