//! Infrastructure implementations for Parentline.
//!
//! This crate provides the concrete implementation of the `LlmProvider`
//! port defined in `parentline-core`, the configuration loader, and the
//! HTTP callback client used by the WebSocket bridge.

pub mod bridge;
pub mod config;
pub mod llm;
