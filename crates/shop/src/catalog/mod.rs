//! Products, categories, store settings and banners.
//!
//! Orders copy what they need from a product at creation time, so editing or
//! deleting a product here never affects existing orders.

pub mod seed;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use topup_core::{Banner, Category, CategoryId, Product, ProductId, StoreSettings};

use crate::error::{Result, ShopError};
use crate::storage::{Storage, StorageError, keys, load_json, save_json};

struct CatalogState {
    products: Vec<Product>,
    settings: StoreSettings,
    banners: Vec<Banner>,
}

/// Catalog backed by a [`Storage`].
pub struct Catalog<S> {
    storage: Arc<S>,
    categories: Vec<Category>,
    state: RwLock<CatalogState>,
}

impl<S: Storage> Catalog<S> {
    /// Load the catalog, falling back to the seed data for absent collections.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a stored document cannot be read.
    pub async fn open(storage: Arc<S>) -> std::result::Result<Self, StorageError> {
        let products = load_json(storage.as_ref(), keys::PRODUCTS)
            .await?
            .unwrap_or_else(seed::products);
        let settings = load_json(storage.as_ref(), keys::SETTINGS)
            .await?
            .unwrap_or_else(seed::settings);
        let banners = load_json(storage.as_ref(), keys::BANNERS)
            .await?
            .unwrap_or_else(seed::banners);

        Ok(Self {
            storage,
            categories: seed::categories(),
            state: RwLock::new(CatalogState {
                products,
                settings,
                banners,
            }),
        })
    }

    /// All products in catalog order.
    pub async fn products(&self) -> Vec<Product> {
        self.state.read().await.products.clone()
    }

    /// Look up a product.
    pub async fn product(&self, id: &ProductId) -> Option<Product> {
        self.state
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == *id)
            .cloned()
    }

    /// All categories.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Products listed under a category.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::EntityNotFound` for an unknown category.
    pub async fn products_in(&self, category_id: &CategoryId) -> Result<Vec<Product>> {
        let category = self
            .categories
            .iter()
            .find(|c| c.id == *category_id)
            .ok_or_else(|| ShopError::EntityNotFound {
                kind: "category",
                id: category_id.to_string(),
            })?;

        Ok(self
            .state
            .read()
            .await
            .products
            .iter()
            .filter(|p| category.lists(p))
            .cloned()
            .collect())
    }

    /// Add a product, or replace the one with the same id. New products go first.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Validation` for an unnamed or unpriced product, or
    /// `ShopError::Storage` if the change cannot be persisted.
    pub async fn upsert_product(&self, product: Product) -> Result<()> {
        if product.name.trim().is_empty() {
            return Err(ShopError::Validation("product name is required".into()));
        }
        if !product.price.is_positive() {
            return Err(ShopError::Validation("product price must be positive".into()));
        }

        let mut state = self.state.write().await;
        let mut next = state.products.clone();
        match next.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => next.insert(0, product),
        }
        self.persist(keys::PRODUCTS, &next).await?;
        state.products = next;
        Ok(())
    }

    /// Remove a product. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Storage` if the change cannot be persisted.
    pub async fn delete_product(&self, id: &ProductId) -> Result<bool> {
        let mut state = self.state.write().await;
        if !state.products.iter().any(|p| p.id == *id) {
            return Ok(false);
        }
        let next: Vec<Product> = state
            .products
            .iter()
            .filter(|p| p.id != *id)
            .cloned()
            .collect();
        self.persist(keys::PRODUCTS, &next).await?;
        state.products = next;
        Ok(true)
    }

    /// Current store settings.
    pub async fn settings(&self) -> StoreSettings {
        self.state.read().await.settings.clone()
    }

    /// Replace the store settings.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Storage` if the change cannot be persisted.
    pub async fn update_settings(&self, settings: StoreSettings) -> Result<()> {
        let mut state = self.state.write().await;
        self.persist(keys::SETTINGS, &settings).await?;
        state.settings = settings;
        Ok(())
    }

    /// Home-page banners.
    pub async fn banners(&self) -> Vec<Banner> {
        self.state.read().await.banners.clone()
    }

    /// Replace all banners.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Storage` if the change cannot be persisted.
    pub async fn replace_banners(&self, banners: Vec<Banner>) -> Result<()> {
        let mut state = self.state.write().await;
        self.persist(keys::BANNERS, &banners).await?;
        state.banners = banners;
        Ok(())
    }

    async fn persist<T: Serialize + ?Sized + Sync>(&self, key: &str, value: &T) -> Result<()> {
        save_json(self.storage.as_ref(), key, value).await?;
        Ok(())
    }
}
