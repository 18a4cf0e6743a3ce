//! # pitwall-adapters
//!
//! Text-generation backends for the Pit Wall simulator.
//!
//! This crate provides implementations of the [`pitwall_proto::RoleGenerator`]
//! trait:
//! - Scripted: offline, deterministic commentary for demos and tests
//! - Http: an OpenAI-compatible chat-completions endpoint
//!
//! The [`build_generator`] factory resolves the configured backend name to
//! a boxed generator; unknown names fail fast before a run starts.

mod factory;
mod http;
mod scripted;

pub use factory::{build_generator, BackendError};
pub use http::HttpGenerator;
pub use scripted::ScriptedGenerator;
