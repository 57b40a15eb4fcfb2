//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Memory writes (202 + submit_id)
        .route("/memories", post(handlers::memory::submit_ingest))
        .route("/memories/{uid}", delete(handlers::memory::submit_clear))
        .route("/actions", post(handlers::memory::submit_action))
        // Memory reads (synchronous)
        .route("/memories/search", get(handlers::memory::search))
        .route("/memories/{uid}", get(handlers::memory::show_all))
        // Task status and history
        .route("/tasks", get(handlers::task::list_tasks))
        .route("/tasks/stats", get(handlers::task::task_stats))
        .route("/tasks/range", get(handlers::task::tasks_by_range))
        .route("/tasks/by-date/{date}", get(handlers::task::tasks_by_date))
        .route("/tasks/{submit_id}", get(handlers::task::get_task))
        // Profiles (direct, synchronous)
        .route("/users/{uid}/profiles", post(handlers::profile::add_profile))
        .route("/users/{uid}/profiles", get(handlers::profile::list_profiles))
        .route(
            "/users/{uid}/profiles/{pid}",
            put(handlers::profile::update_profile),
        )
        .route(
            "/users/{uid}/profiles/{pid}/confirm",
            post(handlers::profile::confirm_profile),
        )
        .route(
            "/users/{uid}/profiles/{pid}",
            delete(handlers::profile::delete_profile),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
