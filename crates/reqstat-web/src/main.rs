//! reqstat web demo server.
//!
//! - Config: YAML (path from argv[1], default `reqstat.yaml`), then
//!   `DD_HOST` / `DD_PORT` / `RELEASE_STAGE` overrides
//! - Per-route and aggregate request timings shipped to DogStatsD over UDP

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use reqstat_web::{app_state, config, router, statsd::StatsdClient};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "reqstat.yaml".to_string());
    let mut cfg = config::load_from_file(&path).expect("config load failed");
    config::apply_env_overrides(&mut cfg, |k| std::env::var(k).ok())
        .expect("invalid environment override");

    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .expect("server.listen must be a valid SocketAddr");

    let client = StatsdClient::connect(&cfg.statsd.host, cfg.statsd.port)
        .expect("statsd client setup failed");

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state, client).expect("router setup failed");

    tracing::info!(%listen, "reqstat-web starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
