//! Axum router wiring.
//!
//! Instrumented routes are declared once through [`InstrumentedRoutes`],
//! which registers each with axum and with the `RouteTable` that names its
//! metrics. The middleware looks routes up by axum's `MatchedPath`, so a
//! route only emits metrics when axum dispatched to it.

use std::sync::Arc;

use axum::{handler::Handler, middleware, routing::get, Router};

use reqstat_core::error::Result;
use reqstat_core::{MetricsClient, RouteTable};

use crate::instrument::instrument;
use crate::{app_state::AppState, handlers, ops};

pub struct InstrumentedRoutes {
    router: Router<AppState>,
    table: RouteTable,
}

impl InstrumentedRoutes {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            table: RouteTable::new(),
        }
    }

    /// Register a `GET` route whose metrics are named `id`.
    pub fn get<H, T>(mut self, path: &str, id: &str, handler: H) -> Result<Self>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.table.insert("GET", path, Some(id))?;
        self.router = self.router.route(path, get(handler));
        Ok(self)
    }
}

impl Default for InstrumentedRoutes {
    fn default() -> Self {
        Self::new()
    }
}

pub fn app_routes() -> Result<InstrumentedRoutes> {
    InstrumentedRoutes::new()
        .get("/test", "test", handlers::test)?
        .get("/users/:id", "users.show", handlers::show_user)
}

/// Full application: instrumented routes, `/healthz` (never instrumented)
/// and the timing middleware sending to `client`.
pub fn build_router<C: MetricsClient + 'static>(state: AppState, client: C) -> Result<Router> {
    let InstrumentedRoutes { router, table } = app_routes()?;
    let instrumentor = Arc::new(state.instrumentor(client, table)?);

    Ok(router
        .route("/healthz", get(ops::healthz))
        .layer(middleware::from_fn_with_state(instrumentor, instrument::<C>))
        .with_state(state))
}
