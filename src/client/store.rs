//! Explicit application state for the storefront and the admin inventory.
//! All mutation goes through named operations so views can simply re-render
//! from the store.

use std::fmt;
use std::future::Future;

use uuid::Uuid;

use super::error::ClientError;
use crate::{
    models::{Availability, Product},
    mood::normalize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient toast-style message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A single-field change an admin can make from the inventory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagChange {
    Featured(bool),
    Availability(Availability),
    Active(bool),
}

impl FlagChange {
    /// Write this change into `product`, returning the change that restores
    /// the previous value of the same field.
    fn apply(self, product: &mut Product) -> FlagChange {
        match self {
            FlagChange::Featured(value) => {
                FlagChange::Featured(std::mem::replace(&mut product.featured, value))
            }
            FlagChange::Availability(value) => {
                FlagChange::Availability(std::mem::replace(&mut product.availability, value))
            }
            FlagChange::Active(value) => {
                FlagChange::Active(std::mem::replace(&mut product.active, value))
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FlagChange::Featured(_) => "featured",
            FlagChange::Availability(_) => "availability",
            FlagChange::Active(_) => "visibility",
        }
    }
}

impl fmt::Display for FlagChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagChange::Featured(v) => write!(f, "featured={v}"),
            FlagChange::Availability(v) => write!(f, "availability={}", v.as_str()),
            FlagChange::Active(v) => write!(f, "active={v}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct InventoryStore {
    items: Vec<Product>,
    notices: Vec<Notice>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn get(&self, id: Uuid) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    pub fn set_products(&mut self, items: Vec<Product>) {
        self.items = items;
    }

    /// Mutate one product in place. Returns `None` when the id is unknown.
    pub fn update_local_item<R>(
        &mut self,
        id: Uuid,
        update: impl FnOnce(&mut Product) -> R,
    ) -> Option<R> {
        self.items.iter_mut().find(|p| p.id == id).map(update)
    }

    /// Replace a product with the server's copy, or append it when new.
    pub fn upsert(&mut self, product: Product) {
        match self.items.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.items.push(product),
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Apply `change` locally right away, then run the remote write. If the
    /// write fails only the changed field is put back and an error notice is
    /// queued. A copy of the product returned by the server replaces the
    /// local one.
    pub async fn apply_optimistic<F, Fut>(
        &mut self,
        id: Uuid,
        change: FlagChange,
        remote: F,
    ) -> Result<(), ClientError>
    where
        F: FnOnce(Uuid, FlagChange) -> Fut,
        Fut: Future<Output = Result<Option<Product>, ClientError>>,
    {
        let previous = self
            .update_local_item(id, |product| change.apply(product))
            .ok_or(ClientError::UnknownProduct(id))?;

        match remote(id, change).await {
            Ok(confirmed) => {
                if let Some(product) = confirmed {
                    self.upsert(product);
                }
                self.push_notice(Notice::info(format!("Saved {}", change.label())));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%id, %change, error = %err, "remote write failed, reverting");
                self.update_local_item(id, |product| previous.apply(product));
                self.push_notice(Notice::error(format!(
                    "Could not update {}: {err}",
                    change.label()
                )));
                Err(err)
            }
        }
    }

    pub async fn toggle_featured<F, Fut>(&mut self, id: Uuid, remote: F) -> Result<(), ClientError>
    where
        F: FnOnce(Uuid, FlagChange) -> Fut,
        Fut: Future<Output = Result<Option<Product>, ClientError>>,
    {
        let current = self.get(id).ok_or(ClientError::UnknownProduct(id))?.featured;
        self.apply_optimistic(id, FlagChange::Featured(!current), remote)
            .await
    }

    pub async fn toggle_sold_out<F, Fut>(&mut self, id: Uuid, remote: F) -> Result<(), ClientError>
    where
        F: FnOnce(Uuid, FlagChange) -> Fut,
        Fut: Future<Output = Result<Option<Product>, ClientError>>,
    {
        let next = match self.get(id).ok_or(ClientError::UnknownProduct(id))?.availability {
            Availability::Available => Availability::SoldOut,
            Availability::SoldOut => Availability::Available,
        };
        self.apply_optimistic(id, FlagChange::Availability(next), remote)
            .await
    }
}

/// Customer-side menu state: the loaded products plus the active filters.
#[derive(Debug, Default)]
pub struct MenuStore {
    products: Vec<Product>,
    category: Option<String>,
    query: String,
}

impl MenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.is_empty());
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Distinct categories of active products in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in self.products.iter().filter(|p| p.active) {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    /// Products to render: active, in the selected category, matching the
    /// accent-insensitive search text. Featured products come first.
    pub fn visible(&self) -> Vec<&Product> {
        let needle = normalize(self.query.trim());
        let mut visible: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.active)
            .filter(|p| self.category.as_deref().is_none_or(|c| p.category == c))
            .filter(|p| {
                needle.is_empty()
                    || normalize(&p.name).contains(&needle)
                    || p
                        .description
                        .as_deref()
                        .is_some_and(|d| normalize(d).contains(&needle))
            })
            .collect();
        visible.sort_by_key(|p| !p.featured);
        visible
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn product(name: &str, category: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            price: 3500,
            category: category.into(),
            active: true,
            availability: Availability::Available,
            featured: false,
            image_url: None,
            trivia: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn featured_toggle_shows_immediately_and_reverts_on_failure() {
        let mut store = InventoryStore::new();
        let target = product("Mango Tango", "Smoothies");
        let id = target.id;
        store.set_products(vec![target, product("Cold Brew", "Coffee")]);
        let before = store.items().to_vec();

        let result = store
            .toggle_featured(id, |_, change| {
                // remote not done yet, local copy already flipped
                assert_eq!(change, FlagChange::Featured(true));
                async { Err::<Option<Product>, _>(ClientError::Offline) }
            })
            .await;

        assert!(matches!(result, Err(ClientError::Offline)));
        assert_eq!(store.items(), before.as_slice());
        let notices = store.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(store.notices().is_empty());
    }

    #[tokio::test]
    async fn successful_write_keeps_the_change() {
        let mut store = InventoryStore::new();
        let target = product("Mango Tango", "Smoothies");
        let id = target.id;
        store.set_products(vec![target]);

        store
            .apply_optimistic(id, FlagChange::Availability(Availability::SoldOut), |_, _| async {
                Ok::<Option<Product>, ClientError>(None)
            })
            .await
            .expect("write succeeds");

        assert_eq!(store.get(id).unwrap().availability, Availability::SoldOut);
        let notices = store.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Info);
    }

    #[tokio::test]
    async fn server_copy_replaces_local_item() {
        let mut store = InventoryStore::new();
        let target = product("Mango Tango", "Smoothies");
        let id = target.id;
        let mut confirmed = target.clone();
        confirmed.featured = true;
        confirmed.trivia = Some("Mangoes are drupes.".into());
        store.set_products(vec![target]);

        store
            .toggle_featured(id, |_, _| async move { Ok::<_, ClientError>(Some(confirmed)) })
            .await
            .expect("write succeeds");

        let product = store.get(id).unwrap();
        assert!(product.featured);
        assert_eq!(product.trivia.as_deref(), Some("Mangoes are drupes."));
        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn sold_out_toggle_reverts_on_failure() {
        let mut store = InventoryStore::new();
        let target = product("Mango Tango", "Smoothies");
        let id = target.id;
        store.set_products(vec![target]);

        let result = store
            .toggle_sold_out(id, |_, change| {
                assert_eq!(change, FlagChange::Availability(Availability::SoldOut));
                async { Err::<Option<Product>, _>(ClientError::Offline) }
            })
            .await;

        assert!(matches!(result, Err(ClientError::Offline)));
        assert_eq!(store.get(id).unwrap().availability, Availability::Available);
        assert!(store.take_notices()[0].message.contains("availability"));

        store
            .toggle_sold_out(id, |_, _| async { Ok::<Option<Product>, ClientError>(None) })
            .await
            .expect("write succeeds");
        assert_eq!(store.get(id).unwrap().availability, Availability::SoldOut);
    }

    #[tokio::test]
    async fn rollback_only_touches_the_changed_field() {
        let mut store = InventoryStore::new();
        let mut target = product("Mango Tango", "Smoothies");
        target.featured = true;
        target.availability = Availability::SoldOut;
        let id = target.id;
        store.set_products(vec![target]);

        let result = store
            .apply_optimistic(id, FlagChange::Active(false), |_, _| async {
                Err::<Option<Product>, _>(ClientError::Api {
                    status: 500,
                    message: "boom".into(),
                })
            })
            .await;
        assert!(result.is_err());
        let product = store.get(id).unwrap();
        assert!(product.active);
        assert!(product.featured);
        assert_eq!(product.availability, Availability::SoldOut);
        assert!(store.notices()[0].message.contains("visibility"));
    }

    #[tokio::test]
    async fn unknown_product_never_calls_remote() {
        let mut store = InventoryStore::new();
        let mut called = false;
        let result = store
            .toggle_featured(Uuid::new_v4(), |_, _| {
                called = true;
                async { Ok::<Option<Product>, ClientError>(None) }
            })
            .await;
        assert!(matches!(result, Err(ClientError::UnknownProduct(_))));
        assert!(!called);
    }

    #[test]
    fn menu_filters_by_category_and_accentless_search() {
        let mut store = MenuStore::new();
        let mut hidden = product("Old Special", "Food");
        hidden.active = false;
        let mut star = product("Piña Fresca", "Drinks");
        star.featured = true;
        store.set_products(vec![
            product("Limonada", "Drinks"),
            star,
            hidden,
            product("Tacos", "Food"),
        ]);

        let names: Vec<&str> = store.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Piña Fresca", "Limonada", "Tacos"]);
        assert_eq!(store.categories(), vec!["Drinks", "Food"]);

        store.set_category(Some("Drinks".into()));
        store.set_query("pina");
        let names: Vec<&str> = store.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Piña Fresca"]);
    }
}
