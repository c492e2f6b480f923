//! trackify - Task Time Tracking Library
//!
//! This library provides the core functionality for the trackify CLI tool:
//! task cards with per-card elapsed-time timers, persisted to a remote
//! document store over its REST API.
//!
//! # Core Concepts
//!
//! - **Cards**: Task records with a description, urgency and accumulated time
//! - **Ticker**: The sole time-keeping primitive, one tick per armed second
//! - **Coordinator**: Enforces that at most one card's timer runs at a time
//! - **Gateway**: Fire-and-forget REST calls against the remote card store
//! - **Session**: Wires store, coordinator, ticker and gateway together
//!
//! # Module Organization
//!
//! - `card`: Card entity, urgency levels, elapsed-time formatting
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `trackify.toml`
//! - `coordinator`: Single-active-timer state machine
//! - `error`: Error types and result aliases
//! - `gateway`: REST client for the remote card store
//! - `output`: Shared CLI output formatting
//! - `session`: Event-driven session combining the pieces above
//! - `store`: In-memory ordered card collection
//! - `ticker`: One-second tick source with arm/disarm semantics

pub mod card;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod output;
pub mod session;
pub mod store;
pub mod ticker;

pub use error::{Error, Result};
