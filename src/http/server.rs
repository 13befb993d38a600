//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, ServerConfig};
use crate::http::handlers::{items, lists};
use crate::http::location::Locator;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::store::ShoppingStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: ShoppingStore,
    pub locator: Arc<Locator>,
}

/// HTTP server for the shopping list API.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    store: ShoppingStore,
}

impl HttpServer {
    /// Create a server backed by a fresh, empty store.
    pub fn new(config: ServerConfig) -> Result<Self, ConfigError> {
        Self::with_store(config, ShoppingStore::new())
    }

    /// Create a server around an existing store handle.
    pub fn with_store(config: ServerConfig, store: ShoppingStore) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let locator = Locator::new(config.listener.base_url()?);

        let state = AppState {
            store: store.clone(),
            locator: Arc::new(locator),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            store,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/shoppinglists", get(lists::get_lists).post(lists::create_list))
            .route(
                "/shoppinglists/{id}",
                get(lists::get_list)
                    .put(lists::replace_list)
                    .patch(lists::patch_list)
                    .delete(lists::delete_list),
            )
            .route(
                "/shoppinglists/{id}/items",
                get(items::get_items).post(items::create_item),
            )
            .route(
                "/shoppinglists/{id}/items/{name}",
                get(items::get_item)
                    .put(items::update_item)
                    .delete(items::delete_item),
            )
            .route("/shoppinglists/{id}/{name}", get(items::get_item))
            .route_layer(middleware::from_fn(metrics::track_metrics))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(X_REQUEST_ID)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(DefaultBodyLimit::disable()),
            )
    }

    /// Run the server until the shutdown signal fires, then drain connections.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown requested");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the API without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the store this server serves.
    pub fn store(&self) -> &ShoppingStore {
        &self.store
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
