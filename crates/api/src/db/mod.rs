//! Data access layer.
//!
//! Handlers talk to storage through the [`UserStore`] and [`ProductStore`]
//! traits. Production wires in the MongoDB implementations; tests substitute
//! the in-memory stores from [`memory`].

pub mod memory;
pub mod products;
pub mod users;

use async_trait::async_trait;
use tamarind_core::{Email, ProductId, UserId};
use thiserror::Error;

use crate::models::{CartItem, CreateProductRequest, NewUser, Product, User};

pub use memory::{MemoryProductStore, MemoryUserStore};
pub use products::MongoProductStore;
pub use users::MongoUserStore;

/// Errors from the data access layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Document could not be serialized to BSON.
    #[error("BSON serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    /// Stored document could not be deserialized.
    #[error("BSON deserialization error: {0}")]
    Deserialization(#[from] bson::de::Error),

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Whether a MongoDB error is a duplicate-key write failure (code 11000).
#[must_use]
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(ref we))
            if we.code == 11000
    )
}

/// Storage operations on user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by normalized email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Create a new account.
    ///
    /// Fails with [`RepositoryError::Conflict`] if the email is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError>;

    /// Replace the user's cart lines.
    async fn update_cart(&self, id: UserId, items: &[CartItem]) -> Result<(), RepositoryError>;
}

/// Storage operations on the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, unfiltered.
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Find one product by id.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Products matching a set of ids (for cart hydration).
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    /// Products flagged as featured.
    async fn find_featured(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Products in a category.
    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError>;

    /// A random sample of up to `count` products.
    async fn sample(&self, count: u32) -> Result<Vec<Product>, RepositoryError>;

    /// Insert a new product from a validated payload.
    async fn insert(&self, request: &CreateProductRequest) -> Result<Product, RepositoryError>;

    /// Delete a product. Returns `false` if no product matched.
    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// Set the featured flag, returning the updated product.
    async fn set_featured(
        &self,
        id: ProductId,
        is_featured: bool,
    ) -> Result<Option<Product>, RepositoryError>;
}
