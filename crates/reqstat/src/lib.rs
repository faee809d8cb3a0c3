//! Top-level facade crate for reqstat.
//!
//! Re-exports the core instrumentation types and the web layer so users can depend on a single crate.

pub mod core {
    pub use reqstat_core::*;
}

pub mod web {
    pub use reqstat_web::*;
}
