//! Main server implementation

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use citycast_core::{Config, ConfigError};
use citycast_weather::{CitySuggestionResolver, OpenWeatherGeocoder, WeatherProvider};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ServerResult;
use crate::handlers;
use crate::state::AppState;

/// HTTP server for the autocomplete and search endpoints
pub struct Server {
    addr: SocketAddr,
    app: Router,
}

impl Server {
    /// Create a server wired to the geocoding and weather APIs named in `config`
    pub fn new(config: &Config) -> ServerResult<Self> {
        let addr = config
            .server
            .bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::new("server.bind_addr", e.to_string()))?;

        let geocoder = OpenWeatherGeocoder::with_timeout(
            &config.geocoding.base_url,
            config.geocoding.api_key.clone(),
            Duration::from_secs(config.geocoding.timeout_secs),
        )?;
        let weather = WeatherProvider::new(
            &config.weather.base_url,
            config.geocoding.api_key.clone(),
            config.weather.forecast_entries,
        )?;

        let state = AppState::new(
            CitySuggestionResolver::new(Arc::new(geocoder)),
            weather,
            config.geocoding.suggestion_limit,
        );

        Ok(Self::with_state(addr, state))
    }

    /// Construct a server from an already-built app state
    pub fn with_state(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            app: build_router(state),
        }
    }

    /// Run until Ctrl-C
    pub async fn run(self) -> ServerResult<()> {
        info!("Starting server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

/// Build the router. Routes are served both at the root and under `/weather`.
pub fn build_router(state: AppState) -> Router {
    let weather_routes = Router::new()
        .route("/autocomplete", get(handlers::autocomplete::autocomplete))
        .route("/search", get(handlers::search::search));

    Router::new()
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::health_check))
        .merge(weather_routes.clone())
        .nest("/weather", weather_routes)
        .fallback(|| async { Redirect::to("/") })
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
