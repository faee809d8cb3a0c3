//! Per-request timing middleware.
//!
//! For every request axum routed to a template registered in the route
//! table (looked up through `MatchedPath`):
//! - `<prefix.>route` and `<prefix.>route.cpu` are emitted by a scope timer
//!   wrapped around the downstream call
//! - `<app>.api.request` and `<app>.api.request.cpu` follow with the same
//!   elapsed values
//!
//! All four carry the default tags plus `http_status_code:<code>` and
//! `http_method:<METHOD>`. Requests axum did not route, and routes without
//! a table entry, are forwarded untouched and produce no metrics.
//!
//! Transport failures are logged and never change the response.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use reqstat_core::error::{ReqstatError, Result};
use reqstat_core::route::strip_query;
use reqstat_core::{
    name, MetricsClient, RouteId, RouteResolver, ScopedTimer, Tag, TagSet, TaggedEmitter, Timing,
    DEFAULT_SAMPLE_RATE,
};

pub struct RequestInstrumentor<C> {
    emitter: TaggedEmitter<C>,
    resolver: Arc<dyn RouteResolver>,
    prefix: Option<String>,
    sample_rate: f64,
    request_metric: String,
    request_cpu_metric: String,
}

impl<C: MetricsClient> RequestInstrumentor<C> {
    pub fn new(emitter: TaggedEmitter<C>, resolver: Arc<dyn RouteResolver>, app_name: &str) -> Self {
        Self {
            emitter,
            resolver,
            prefix: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            request_metric: format!("{app_name}.api.request"),
            request_cpu_metric: format!("{app_name}.api.request.cpu"),
        }
    }

    /// Prefix for per-route metric names. Empty strings count as no prefix.
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    /// Sample rate of the per-route timings.
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Metric name for a request target (`/path?query`).
    pub fn metric_name(&self, method: &str, target: &str) -> Result<String> {
        let route = self.resolver.resolve(strip_query(target), method)?;
        self.prefixed(&route)
    }

    /// Metric name for a route template the server's router matched.
    /// `None` (nothing matched) is `RouteNotFound`.
    pub fn template_metric_name(&self, method: &str, template: Option<&str>) -> Result<String> {
        let template = template.ok_or_else(|| ReqstatError::RouteNotFound {
            method: method.to_string(),
            path: String::new(),
        })?;
        let route = self.resolver.resolve_template(template, method)?;
        self.prefixed(&route)
    }

    fn prefixed(&self, route: &RouteId) -> Result<String> {
        let metric = name::join(self.prefix.as_deref(), route.as_str());
        name::validate(&metric)?;
        Ok(metric)
    }

    /// Time `downstream` and emit the per-route and aggregate metrics,
    /// resolving the raw request target against the route table.
    ///
    /// Unmatched routes run `downstream` without any timing. Any other
    /// naming failure is answered with an error response and `downstream`
    /// is not run.
    pub async fn observe<F>(&self, method: &Method, target: &str, downstream: F) -> Response
    where
        F: Future<Output = Response>,
    {
        let path = strip_query(target);
        let naming = self.metric_name(method.as_str(), target);
        self.timed(method, path, naming, downstream).await
    }

    /// Same as [`RequestInstrumentor::observe`], but the route is the
    /// template the server's router already matched.
    pub async fn observe_matched<F>(&self, method: &Method, template: Option<&str>, downstream: F) -> Response
    where
        F: Future<Output = Response>,
    {
        let naming = self.template_metric_name(method.as_str(), template);
        self.timed(method, template.unwrap_or(""), naming, downstream).await
    }

    async fn timed<F>(&self, method: &Method, path: &str, naming: Result<String>, downstream: F) -> Response
    where
        F: Future<Output = Response>,
    {
        let metric = match naming {
            Ok(m) => m,
            Err(e) if e.is_route_not_found() => {
                tracing::trace!(%method, %path, "no route, request not instrumented");
                return downstream.await;
            }
            Err(e) => {
                tracing::error!(%method, %path, error = %e, "metric naming failed");
                return error_response(&e);
            }
        };

        let mut timer = ScopedTimer::with_options(&self.emitter, metric, self.sample_rate, TagSet::new());
        let response = downstream.await;

        let status = response.status();
        timer.tags.insert(Tag::sanitized("http_status_code", status.as_u16()));
        timer.tags.insert(Tag::sanitized("http_method", method));

        let metric = timer.name().to_string();
        let (timing, res) = timer.finish();
        if let Err(e) = res {
            tracing::warn!(%metric, error = %e, "route timing emission failed");
        }
        if let Err(e) = self.emit_request_totals(&timing) {
            tracing::warn!(metric = %self.request_metric, error = %e, "request timing emission failed");
        }

        tracing::debug!(
            %metric,
            status = status.as_u16(),
            wall_secs = timing.time().as_secs_f64(),
            cpu_secs = timing.cpu_time().as_secs_f64(),
            "request instrumented"
        );
        response
    }

    fn emit_request_totals(&self, timing: &Timing) -> Result<()> {
        let tags = Some(timing.tags());
        let wall = self.emitter.timing(
            &self.request_metric,
            timing.time().as_secs_f64(),
            DEFAULT_SAMPLE_RATE,
            tags,
        );
        let cpu = self.emitter.timing(
            &self.request_cpu_metric,
            timing.cpu_time().as_secs_f64(),
            DEFAULT_SAMPLE_RATE,
            tags,
        );
        wall.and(cpu)
    }
}

/// axum middleware entry. Install with
/// `middleware::from_fn_with_state(instrumentor, instrument::<C>)`.
pub async fn instrument<C: MetricsClient + 'static>(
    State(instrumentor): State<Arc<RequestInstrumentor<C>>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let matched = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_owned());

    instrumentor
        .observe_matched(&method, matched.as_deref(), next.run(req))
        .await
}

fn error_response(e: &ReqstatError) -> Response {
    let body = Json(json!({
        "code": e.code().as_str(),
        "msg": e.to_string(),
    }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
