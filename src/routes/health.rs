use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

/// Health check endpoint
///
/// Returns the current status of the API. Registered outside the
/// authenticated scope.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok"
    }))
}
