//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::{get, post, put};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(_)) => {
            tracing::warn!(origin, "invalid CORS origin, allowing any");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.server.cors_origin.as_deref());

    let api_routes = Router::new()
        // Feed
        .route("/skills", get(handlers::skill::list_skills))
        .route(
            "/skills/{id}/exchange-status",
            get(handlers::skill::skill_exchange_status),
        )
        // Exchange requests
        .route(
            "/exchange-requests",
            post(handlers::exchange::create_request).get(handlers::exchange::list_requests),
        )
        .route("/exchange-requests/sent", get(handlers::exchange::list_sent))
        .route(
            "/exchange-requests/received",
            get(handlers::exchange::list_received),
        )
        .route(
            "/exchange-requests/{id}",
            get(handlers::exchange::get_request).delete(handlers::exchange::cancel),
        )
        .route(
            "/exchange-requests/{id}/status",
            put(handlers::exchange::respond),
        )
        .route(
            "/exchange-requests/{id}/exchange",
            get(handlers::exchange::get_exchange),
        )
        .route(
            "/exchange-requests/{id}/rating",
            post(handlers::exchange::rate),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness plus a database round trip.
async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, axum::Json<serde_json::Value>) {
    let database = sqlx::query("SELECT 1")
        .execute(&state.db_pool.reader)
        .await
        .is_ok();

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        axum::Json(serde_json::json!({
            "status": if database { "ok" } else { "degraded" },
            "database": database,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
