use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::db::backend::StorageError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Create request lacks one or more required fields.
    #[error("missing required fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("product {0} not found")]
    NotFound(String),

    /// Request body is not a JSON object of scalar fields.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Every id up to `u64::MAX` is taken.
    #[error("no product ids left to allocate")]
    IdsExhausted,

    /// Read, parse or write of the backing document failed. `context` is the
    /// client-facing message for the operation that failed.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StorageError,
    },
}

impl AppError {
    pub fn storage(context: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| AppError::Storage { context, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(missing) => {
                warn!(missing = ?missing, "Rejected product without required fields");
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "mensaje": "Faltan campos requeridos",
                        "campos_faltantes": missing,
                    }),
                )
            }
            AppError::NotFound(id) => {
                warn!(id = %id, "Product not found");
                (
                    StatusCode::NOT_FOUND,
                    json!({ "mensaje": "Producto no encontrado" }),
                )
            }
            AppError::InvalidBody(reason) => {
                warn!(reason = %reason, "Rejected request body");
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "mensaje": "Cuerpo de la solicitud inválido",
                        "error": reason,
                    }),
                )
            }
            AppError::IdsExhausted => {
                error!("Product id space exhausted");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "mensaje": "Error al crear el producto",
                        "error": self.to_string(),
                    }),
                )
            }
            AppError::Storage { context, source } => {
                error!(error = %source, "{}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "mensaje": context,
                        "error": source.to_string(),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_field_list() {
        let (status, body) =
            render(AppError::Validation(vec!["price".into(), "stock".into()])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["campos_faltantes"], json!(["price", "stock"]));
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, body) = render(AppError::NotFound("07".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["mensaje"], "Producto no encontrado");
    }

    #[tokio::test]
    async fn invalid_body_maps_to_400_json() {
        let (status, body) = render(AppError::InvalidBody("expected a map".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["mensaje"], "Cuerpo de la solicitud inválido");
        assert_eq!(body["error"], "expected a map");
    }

    #[tokio::test]
    async fn exhausted_ids_map_to_500() {
        let (status, body) = render(AppError::IdsExhausted).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["mensaje"], "Error al crear el producto");
    }

    #[tokio::test]
    async fn storage_maps_to_500_with_raw_error() {
        let source = StorageError::Io {
            path: "products.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let (status, body) =
            render(AppError::storage("Error al obtener los productos")(source)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["mensaje"], "Error al obtener los productos");
        assert!(body["error"].as_str().unwrap().contains("gone"));
    }
}
