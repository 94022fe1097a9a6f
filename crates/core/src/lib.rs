//! `relay-core` — shared vocabulary for the relay event emitter.
//!
//! This crate holds the **plain data** types used across the workspace: event
//! keys and the listener error model. It has no dispatch logic.

pub mod error;
pub mod key;

pub use error::{ListenerError, ListenerResult};
pub use key::EventKey;
