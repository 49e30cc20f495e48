//! Observability setup for Parentline: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
