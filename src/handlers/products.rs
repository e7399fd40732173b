use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::{Product, ProductFields, ProductFilters},
    AppState,
};

/// Unwraps a JSON body. A request without a JSON content type carries no
/// fields; any other rejection becomes a 400 with the extractor's reason.
fn payload_fields(body: Result<Json<ProductFields>, JsonRejection>) -> AppResult<ProductFields> {
    match body {
        Ok(Json(fields)) => Ok(fields),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(ProductFields::new()),
        Err(rejection) => Err(AppError::InvalidBody(rejection.body_text())),
    }
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    Query(filters): Query<ProductFilters>,
) -> AppResult<(StatusCode, Json<Vec<Product>>)> {
    let start = Instant::now();
    let products = state.store.fetch_all_products(&filters).await?;

    info!(
        count = products.len(),
        filtered = !filters.is_empty(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed products"
    );

    Ok((StatusCode::OK, Json(products)))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.store.fetch_product_by_id(&id).await?;

    info!(id = %id, "Fetched product");

    Ok((StatusCode::OK, Json(product)))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<ProductFields>, JsonRejection>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();
    let product = state.store.insert_product(payload_fields(body)?).await?;

    info!(
        id = product.id().unwrap_or_default(),
        elapsed_ms = start.elapsed().as_millis(),
        "Created product"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "mensaje": "Producto creado exitosamente",
            "producto": product,
        })),
    ))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProductFields>, JsonRejection>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();
    let payload = payload_fields(body)?;
    let fields = payload.len();
    let product = state.store.update_product(&id, payload).await?;

    info!(
        id = %id,
        fields,
        elapsed_ms = start.elapsed().as_millis(),
        "Updated product"
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "mensaje": "Producto actualizado exitosamente",
            "producto": product,
        })),
    ))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();
    let product = state.store.delete_product(&id).await?;

    info!(
        id = %id,
        elapsed_ms = start.elapsed().as_millis(),
        "Deleted product"
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "mensaje": "Producto eliminado exitosamente",
            "producto": product,
        })),
    ))
}
