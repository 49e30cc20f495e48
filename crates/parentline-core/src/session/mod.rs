//! In-memory per-session conversation state.

pub mod store;

pub use store::SessionStore;
