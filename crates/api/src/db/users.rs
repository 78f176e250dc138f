//! MongoDB-backed user repository.

use async_trait::async_trait;
use bson::doc;
use chrono::Utc;
use mongodb::{Collection, Database, IndexModel, options::IndexOptions};
use tamarind_core::{Email, UserId};

use super::{RepositoryError, UserStore, is_duplicate_key};
use crate::models::{CartItem, NewUser, User};

const COLLECTION: &str = "users";

/// User repository over the `users` collection.
#[derive(Debug, Clone)]
pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Create the unique email index.
    ///
    /// Account uniqueness relies on this index; run it at startup before
    /// accepting traffic.
    ///
    /// # Errors
    ///
    /// Returns an error if index creation fails.
    pub async fn ensure_indexes(&self) -> Result<(), RepositoryError> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = self
            .collection
            .find_one(doc! { "email": email.as_str() })
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = self
            .collection
            .find_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            cart_items: Vec::new(),
            role: tamarind_core::Role::Customer,
            created_at: now,
            updated_at: now,
        };

        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(RepositoryError::Conflict(
                "email already registered".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_cart(&self, id: UserId, items: &[CartItem]) -> Result<(), RepositoryError> {
        let items = bson::to_bson(items)?;
        self.collection
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": { "cartItems": items, "updatedAt": bson::DateTime::now() } },
            )
            .await?;
        Ok(())
    }
}
