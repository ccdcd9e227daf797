//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_handler, clear_handler, dec_handler, delete_handler, entries_handler, exists_handler,
    get_handler, get_ttl_handler, health_handler, inc_handler, meminfo_handler, set_handler,
    set_ttl_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// `/del/*search` captures the rest of the path, so delimited patterns such
/// as `/del//^user/` reach the handler with their slashes intact.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/add", post(add_handler))
        .route("/get/:key", get(get_handler))
        .route("/exists/:key", get(exists_handler))
        .route("/inc/:key", post(inc_handler))
        .route("/dec/:key", post(dec_handler))
        .route("/del/*search", delete(delete_handler))
        .route("/clear", post(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/meminfo", get(meminfo_handler))
        .route("/entries", get(entries_handler))
        .route("/ttl", get(get_ttl_handler).put(set_ttl_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
