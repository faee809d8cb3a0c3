//! Config loader (strict parsing) and environment overrides.

pub mod schema;

use std::fs;

use reqstat_core::error::{ReqstatError, Result};

pub use schema::{AppSection, ReqstatConfig, ServerSection, StatsdSection};

pub fn load_from_file(path: &str) -> Result<ReqstatConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ReqstatError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ReqstatConfig> {
    let cfg: ReqstatConfig = serde_yaml::from_str(s)
        .map_err(|e| ReqstatError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply `DD_HOST`, `DD_PORT` and `RELEASE_STAGE` on top of a loaded config.
///
/// `lookup` is `std::env::var` in the binary; tests pass a map.
pub fn apply_env_overrides<F>(cfg: &mut ReqstatConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("DD_HOST") {
        cfg.statsd.host = host;
    }
    if let Some(port) = lookup("DD_PORT") {
        cfg.statsd.port = port
            .trim()
            .parse()
            .map_err(|_| ReqstatError::BadConfig(format!("DD_PORT is not a port: {port}")))?;
    }
    if let Some(stage) = lookup("RELEASE_STAGE") {
        cfg.app.stage = stage;
    }
    cfg.validate()
}
