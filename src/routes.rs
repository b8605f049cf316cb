//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod records;


use crate::config::Settings;
use crate::error::panic_response;
use crate::state::{AppState, Backend};
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Prefix of the stored routine surface
pub const PROCEDURES_PREFIX: &str = "/procedures";

/// Create the application router with all routes and middleware
pub fn create_router(state: &AppState, settings: &Settings) -> Router {
    let routes = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Direct statement routes
        .merge(backend_routes("", &state.direct))
        // Stored routine routes
        .merge(backend_routes(PROCEDURES_PREFIX, &state.procedures));

    with_middleware(routes, settings)
}

/// Wrap routes in the request id, tracing, compression, CORS and panic layers
fn with_middleware(routes: Router, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id()
        .layer(CatchPanicLayer::custom(panic_response));

    routes.layer(middleware)
}

/// All entity routes for one backend under `prefix`
fn backend_routes(prefix: &str, backend: &Backend) -> Router {
    let items = format!("{}/items", prefix);

    Router::new()
        .merge(records::record_routes(&items, backend.items.clone()))
        .merge(records::brand_routes(&items, backend.item_search.clone()))
        .merge(records::record_routes(
            &format!("{}/customers", prefix),
            backend.customers.clone(),
        ))
        .merge(records::record_routes(
            &format!("{}/technicians", prefix),
            backend.technicians.clone(),
        ))
        .merge(records::record_routes(
            &format!("{}/service-records", prefix),
            backend.service_records.clone(),
        ))
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    };

    cors.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
