//! Shared application state for the reqstat web app.
//!
//! Holds the validated config and builds the request instrumentor from it,
//! so the binary and tests wire metrics the same way.

use std::sync::Arc;

use reqstat_core::error::Result;
use reqstat_core::{MetricsClient, RouteTable, TaggedEmitter};

use crate::config::ReqstatConfig;
use crate::instrument::RequestInstrumentor;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ReqstatConfig,
}

impl AppState {
    pub fn new(cfg: ReqstatConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg }),
        }
    }

    pub fn cfg(&self) -> &ReqstatConfig {
        &self.inner.cfg
    }

    /// Instrumentor over `client`: config default tags, app name, prefix
    /// and sample rate, naming metrics from `routes`.
    pub fn instrumentor<C: MetricsClient>(
        &self,
        client: C,
        routes: RouteTable,
    ) -> Result<RequestInstrumentor<C>> {
        let cfg = self.cfg();
        let emitter = TaggedEmitter::new(client, cfg.default_tags()?);

        tracing::info!(
            app = %cfg.app.name,
            prefix = cfg.app.prefix.as_deref().unwrap_or(""),
            routes = routes.len(),
            "request instrumentation configured"
        );

        Ok(RequestInstrumentor::new(emitter, Arc::new(routes), &cfg.app.name)
            .with_prefix(cfg.app.prefix.clone())
            .with_sample_rate(cfg.statsd.sample_rate))
    }
}
