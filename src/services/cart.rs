use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Amount, CartItem, Category, OrderConfirmation, Recommendation},
    storage::{persist, KeyValueStore, StorageKey},
};

/// Owns the cart and snapshots it to storage after every mutation
pub struct CartManager {
    store: Arc<dyn KeyValueStore>,
    items: Vec<CartItem>,
}

impl CartManager {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match store.get(StorageKey::Cart) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable cart snapshot");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart snapshot");
                Vec::new()
            }
        };

        Self { store, items }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, recommendation: Recommendation, category: Category) -> CartItem {
        let item = CartItem::new(recommendation, category);
        self.items.push(item.clone());
        self.save();

        tracing::info!(
            item_id = %item.id,
            category = %category,
            cart_size = self.items.len(),
            "Added item to cart"
        );

        item
    }

    /// Removes one item; unknown ids are a no-op
    pub fn remove(&mut self, id: Uuid) -> Option<CartItem> {
        let position = self.items.iter().position(|item| item.id == id)?;
        let removed = self.items.remove(position);
        self.save();

        tracing::info!(item_id = %id, cart_size = self.items.len(), "Removed item from cart");

        Some(removed)
    }

    pub fn total(&self) -> Amount {
        self.items.iter().map(CartItem::amount).sum()
    }

    /// Validates, then clears the cart and returns the receipt
    pub fn checkout(&mut self, address: &str) -> AppResult<OrderConfirmation> {
        if self.items.is_empty() {
            return Err(AppError::EmptyCart);
        }
        if address.trim().is_empty() {
            return Err(AppError::MissingAddress);
        }

        let confirmation = OrderConfirmation {
            total: self.total(),
            destination: address.to_string(),
            item_count: self.items.len(),
            placed_at: Utc::now(),
        };

        self.items.clear();
        self.save();

        tracing::info!(
            total = %confirmation.total,
            items = confirmation.item_count,
            "Checkout completed"
        );

        Ok(confirmation)
    }

    fn save(&self) {
        match serde_json::to_string(&self.items) {
            Ok(json) => persist(self.store.as_ref(), StorageKey::Cart, &json),
            Err(e) => tracing::error!(error = %e, "Cart serialization error"),
        }
    }
}
