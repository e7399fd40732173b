pub mod backend;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::*;

use self::backend::ProductStorage;

/// Product collection operations over an injected storage backend.
///
/// The collection is reloaded from the backend on every call; nothing is cached.
/// Mutations hold `writer` for their whole read-modify-write so concurrent
/// requests cannot overwrite each other's changes.
pub struct ProductStore {
    backend: Arc<dyn ProductStorage>,
    writer: Mutex<()>,
}

impl ProductStore {
    pub fn new(backend: Arc<dyn ProductStorage>) -> Self {
        Self {
            backend,
            writer: Mutex::new(()),
        }
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    pub async fn fetch_all_products(&self, filters: &ProductFilters) -> AppResult<Vec<Product>> {
        let products = self
            .backend
            .load()
            .await
            .map_err(AppError::storage("Error al obtener los productos"))?;

        if filters.is_empty() {
            return Ok(products);
        }
        Ok(products.into_iter().filter(|p| p.matches(filters)).collect())
    }

    pub async fn fetch_product_by_id(&self, id: &str) -> AppResult<Product> {
        self.backend
            .load()
            .await
            .map_err(AppError::storage("Error al obtener el producto"))?
            .into_iter()
            .find(|p| p.has_id(id))
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    pub async fn insert_product(&self, fields: ProductFields) -> AppResult<Product> {
        let missing = missing_required_fields(&fields);
        if !missing.is_empty() {
            return Err(AppError::Validation(missing));
        }

        const CONTEXT: &str = "Error al crear el producto";
        let _guard = self.writer.lock().await;

        let mut products = self.backend.load().await.map_err(AppError::storage(CONTEXT))?;
        let id = next_id(&products).ok_or(AppError::IdsExhausted)?;
        let product = Product::with_id(id, fields);
        products.push(product.clone());
        self.backend
            .save(&products)
            .await
            .map_err(AppError::storage(CONTEXT))?;

        Ok(product)
    }

    pub async fn update_product(&self, id: &str, fields: ProductFields) -> AppResult<Product> {
        const CONTEXT: &str = "Error al actualizar el producto";
        let _guard = self.writer.lock().await;

        let mut products = self.backend.load().await.map_err(AppError::storage(CONTEXT))?;
        let existing = products
            .iter_mut()
            .find(|p| p.has_id(id))
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        existing.merge(fields);
        let product = existing.clone();

        self.backend
            .save(&products)
            .await
            .map_err(AppError::storage(CONTEXT))?;

        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> AppResult<Product> {
        const CONTEXT: &str = "Error al eliminar el producto";
        let _guard = self.writer.lock().await;

        let mut products = self.backend.load().await.map_err(AppError::storage(CONTEXT))?;
        let index = products
            .iter()
            .position(|p| p.has_id(id))
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        let removed = products.remove(index);

        self.backend
            .save(&products)
            .await
            .map_err(AppError::storage(CONTEXT))?;

        Ok(removed)
    }
}
