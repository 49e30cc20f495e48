//! Business logic for Parentline.
//!
//! This crate defines the `LlmProvider` port that the infrastructure layer
//! implements, plus everything between a decoded request and a formatted
//! reply. It depends only on `parentline-types` -- never on
//! `parentline-infra` or any network crate.

pub mod filter;
pub mod llm;
pub mod persona;
pub mod prompt;
pub mod relay;
pub mod reply;
pub mod session;
