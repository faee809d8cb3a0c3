use std::net::SocketAddr;

use serde::Deserialize;

use reqstat_core::error::{ReqstatError, Result};
use reqstat_core::{name, Tag, TagSet};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReqstatConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    pub app: AppSection,

    #[serde(default)]
    pub statsd: StatsdSection,
}

impl ReqstatConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ReqstatError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.app.validate()?;
        self.statsd.validate()?;

        Ok(())
    }

    /// `app:<name>`, `stage:<stage>`, then `statsd.tags`.
    pub fn default_tags(&self) -> Result<TagSet> {
        let mut tags = TagSet::new();
        tags.insert(Tag::new("app", &self.app.name)?);
        tags.insert(Tag::new("stage", &self.app.stage)?);
        tags.extend(self.statsd.tags.iter().cloned());
        Ok(tags)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen.parse::<SocketAddr>().map_err(|_| {
            ReqstatError::BadConfig(format!(
                "server.listen must be a valid SocketAddr: {}",
                self.listen
            ))
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    pub name: String,

    #[serde(default = "default_stage")]
    pub stage: String,

    /// Prepended (with a dot) to every per-route metric name.
    #[serde(default)]
    pub prefix: Option<String>,
}

impl AppSection {
    pub fn validate(&self) -> Result<()> {
        name::validate(&self.name)
            .map_err(|e| ReqstatError::BadConfig(format!("app.name: {e}")))?;
        if let Some(p) = &self.prefix {
            name::validate(p).map_err(|e| ReqstatError::BadConfig(format!("app.prefix: {e}")))?;
        }
        if self.stage.is_empty() {
            return Err(ReqstatError::BadConfig("app.stage must not be empty".into()));
        }
        Tag::new("stage", &self.stage)
            .map_err(|e| ReqstatError::BadConfig(format!("app.stage: {e}")))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsdSection {
    #[serde(default = "default_statsd_host")]
    pub host: String,

    #[serde(default = "default_statsd_port")]
    pub port: u16,

    /// Extra process-wide tags.
    #[serde(default)]
    pub tags: TagSet,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
}

impl Default for StatsdSection {
    fn default() -> Self {
        Self {
            host: default_statsd_host(),
            port: default_statsd_port(),
            tags: TagSet::new(),
            sample_rate: default_sample_rate(),
        }
    }
}

impl StatsdSection {
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ReqstatError::BadConfig("statsd.host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(ReqstatError::BadConfig("statsd.port must not be 0".into()));
        }
        if !(self.sample_rate > 0.0 && self.sample_rate <= 1.0) {
            return Err(ReqstatError::BadConfig(
                "statsd.sample_rate must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_stage() -> String {
    "testing".into()
}
fn default_statsd_host() -> String {
    "localhost".into()
}
fn default_statsd_port() -> u16 {
    8125
}
fn default_sample_rate() -> f64 {
    1.0
}
