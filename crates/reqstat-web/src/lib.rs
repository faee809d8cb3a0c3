//! reqstat web library entry.
//!
//! This crate wires the route-aware timing middleware, the DogStatsD
//! transport, and config loading into an axum application. It is intended
//! to be consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod handlers;
pub mod instrument;
pub mod ops;
pub mod router;
pub mod statsd;
