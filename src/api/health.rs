use axum::{response::IntoResponse, Json};

// Liveness only; it does not touch the generator or Etherscan.
#[utoipa::path(
    get,
    path = "/api/py/health",
    tag = "erc7730",
    responses((status = 200, description = "Service is up, with the crate version"))
)]
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
