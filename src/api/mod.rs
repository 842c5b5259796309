//! # API Module
//!
//! HTTP handlers for the descriptor service. Every route lives under `/api/py`.
//!
//! ## Available Endpoints
//!
//! - `POST /api/py/generateERC7730` - Generate a descriptor from an ABI or a contract address
//! - `GET /api/py/debug` - Report the generator's current signature and version
//! - `GET /api/py/health` - Liveness check
//! - `GET /api/py/openapi.json` - OpenAPI document
//! - `GET /api/py/docs/` - Swagger UI for the OpenAPI document

pub mod debug;
pub mod error;
pub mod generate;
pub mod health;
pub mod openapi;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::AppState;

pub const API_PREFIX: &str = "/api/py";
pub const DOCS_PATH: &str = "/api/py/docs";
pub const OPENAPI_PATH: &str = "/api/py/openapi.json";

/// Builds the application router with all routes nested under [`API_PREFIX`].
pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/generateERC7730", post(generate::generate_erc7730_handler))
        .route("/debug", get(debug::debug_handler))
        .route("/health", get(health::health_handler));

    Router::new()
        .nest(API_PREFIX, api_router)
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, openapi::ApiDoc::openapi()))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
