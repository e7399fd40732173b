pub mod products;

use axum::{http::StatusCode, Json};
use serde_json::json;

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "service": "product-store-service" })))
}

/// Endpoint catalog served at `/`.
pub async fn index() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "mensaje": "API de productos",
            "endpoints": [
                endpoint("GET", "/products", "List products, filtered by query string"),
                endpoint("GET", "/products/:id", "Get a product by id"),
                endpoint(
                    "POST",
                    "/products",
                    "Create a product (title, description, price, image, stock)",
                ),
                endpoint("PUT", "/products/:id", "Merge fields into a product"),
                endpoint("DELETE", "/products/:id", "Delete a product"),
            ],
        })),
    )
}

fn endpoint(method: &str, path: &str, description: &str) -> serde_json::Value {
    json!({ "method": method, "path": path, "description": description })
}
