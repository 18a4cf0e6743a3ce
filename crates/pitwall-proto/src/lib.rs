//! # pitwall-proto
//!
//! Shared types, error definitions, and traits for the Pit Wall simulator.
//!
//! This crate provides the foundational abstractions used across all Pit Wall
//! crates, including:
//! - Lap, weather, and session metadata records replayed by the simulator
//! - Role definitions for the scripted pit-crew personas
//! - The `RoleGenerator` trait implemented by text-generation backends
//! - Trigger and interruption classification types
//! - Common error types

mod error;
mod generator;
mod lap;
mod meta;
mod plan;
mod role;
mod trigger;
mod weather;

pub use error::{Error, Result};
pub use generator::RoleGenerator;
pub use lap::{Compound, LapRecord, TrackStatus};
pub use meta::{DriverInfo, SessionMeta};
pub use plan::{Plan, StrategyLogEntry};
pub use role::RoleId;
pub use trigger::{Interruption, TriggerReason};
pub use weather::WeatherSample;
