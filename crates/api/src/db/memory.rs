//! In-memory store implementations for tests.
//!
//! These mirror the MongoDB repositories closely enough that the router can
//! be exercised end to end without a database, including the unique-email
//! conflict on account creation.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;
use tamarind_core::{Email, ProductId, Role, UserId};

use super::{ProductStore, RepositoryError, UserStore};
use crate::models::{CartItem, CreateProductRequest, NewUser, Product, User};

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<UserId, User>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<UserId, User>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flip an existing account to admin (test setup helper).
    pub fn promote_to_admin(&self, id: UserId) {
        if let Some(user) = self.write().get_mut(&id) {
            user.role = Role::Admin;
        }
    }

    /// Delete an account outright (test setup helper).
    pub fn remove(&self, id: UserId) {
        self.write().remove(&id);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self.read().values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.read().get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.write();
        if users.values().any(|u| u.email == new_user.email) {
            return Err(RepositoryError::Conflict(
                "email already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            cart_items: Vec::new(),
            role: Role::Customer,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_cart(&self, id: UserId, items: &[CartItem]) -> Result<(), RepositoryError> {
        if let Some(user) = self.write().get_mut(&id) {
            user.cart_items = items.to_vec();
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// In-memory [`ProductStore`].
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog (test setup helper).
    pub fn seed(&self, products: Vec<Product>) {
        self.write().extend(products);
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Product>> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Product>> {
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.read().clone())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.read().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .read()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_featured(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .read()
            .iter()
            .filter(|p| p.is_featured)
            .cloned()
            .collect())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .read()
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    async fn sample(&self, count: u32) -> Result<Vec<Product>, RepositoryError> {
        let mut products = self.read().clone();
        products.shuffle(&mut rand::rng());
        products.truncate(count as usize);
        Ok(products)
    }

    async fn insert(&self, request: &CreateProductRequest) -> Result<Product, RepositoryError> {
        let product = Product {
            id: ProductId::new(),
            name: request.name.clone(),
            description: request.description.clone(),
            price: request.price,
            image: request.image.clone().unwrap_or_default(),
            category: request.category.clone(),
            is_featured: false,
        };
        self.write().push(product.clone());
        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut products = self.write();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }

    async fn set_featured(
        &self,
        id: ProductId,
        is_featured: bool,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut products = self.write();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.is_featured = is_featured;
        Ok(Some(product.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tamarind_core::Price;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".to_string(),
            email: Email::parse(email).unwrap(),
            password_hash: "$2b$10$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store.create(new_user("ada@example.com")).await.unwrap();

        let err = store.create(new_user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_cart_replaces_lines() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ada@example.com")).await.unwrap();

        let items = vec![CartItem {
            product: ProductId::new(),
            quantity: 3,
        }];
        store.update_cart(user.id, &items).await.unwrap();

        let reloaded = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.cart_items, items);
    }

    fn product(category: &str, featured: bool) -> Product {
        Product {
            id: ProductId::new(),
            name: "Linen shirt".to_string(),
            description: "A shirt".to_string(),
            price: Price::from_cents(2999),
            image: String::new(),
            category: category.to_string(),
            is_featured: featured,
        }
    }

    #[tokio::test]
    async fn test_featured_and_category_filters() {
        let store = MemoryProductStore::new();
        store.seed(vec![
            product("shirts", true),
            product("shirts", false),
            product("shoes", false),
        ]);

        assert_eq!(store.find_featured().await.unwrap().len(), 1);
        assert_eq!(store.find_by_category("shirts").await.unwrap().len(), 2);
        assert_eq!(store.find_by_category("hats").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_sample_caps_at_catalog_size() {
        let store = MemoryProductStore::new();
        store.seed(vec![product("shirts", false), product("shoes", false)]);

        assert_eq!(store.sample(4).await.unwrap().len(), 2);
        assert_eq!(store.sample(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_missing() {
        let store = MemoryProductStore::new();
        let request = CreateProductRequest {
            name: "Linen shirt".to_string(),
            description: "A shirt".to_string(),
            price: Price::from_cents(2999),
            image: None,
            category: "shirts".to_string(),
        };
        let created = store.insert(&request).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
    }
}
