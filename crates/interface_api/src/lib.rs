//! HTTP API Layer
//!
//! This crate provides the REST API for the policy management system
//! using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: thin orchestration - parse, call the domain, call the store
//! - **DTOs**: request/response data transfer objects
//! - **Middleware**: request tracing and audit logging
//! - **Error Handling**: consistent error responses with RFC-ish bodies
//!
//! The handlers depend on the `PolicyStore` port, never on a concrete
//! database, so the same router runs against PostgreSQL in production
//! and against an in-memory store in the test suite.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(store, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_policy::PolicyStore;

use crate::config::ApiConfig;
use crate::handlers::{health, policy};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PolicyStore>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `store` - The policy store adapter
/// * `config` - API configuration
pub fn create_router(store: Arc<dyn PolicyStore>, config: ApiConfig) -> Router {
    let state = AppState { store, config };

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Policy routes
    let policy_routes = Router::new()
        .route("/", post(policy::create_policy).get(policy::list_policies))
        .route("/:id", get(policy::get_policy))
        .route("/:id/status", put(policy::update_policy_status));

    let api_routes = Router::new()
        .nest("/policies", policy_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
