//! reqstat core: transport-agnostic request instrumentation primitives.
//!
//! This crate defines the tag model, the default-tag injecting emitter, the
//! dual-clock scope timer and the route table used to derive bounded metric
//! names. It intentionally carries no HTTP or runtime dependencies so it can
//! be reused behind any server framework.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `ReqstatError`/`Result` so metric
//! emission never crashes the process that hosts it.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod client;
pub mod cpu;
pub mod emitter;
pub mod error;
pub mod memory;
pub mod name;
pub mod route;
pub mod tag;
pub mod timer;

pub use client::{MetricsClient, DEFAULT_SAMPLE_RATE};
pub use emitter::TaggedEmitter;
pub use error::{ErrorCode, ReqstatError, Result};
pub use memory::MemoryClient;
pub use route::{RouteId, RouteResolver, RouteTable};
pub use tag::{Tag, TagSet};
pub use timer::{ScopedTimer, Timing};
