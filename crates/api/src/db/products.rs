//! MongoDB-backed product repository.

use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use tamarind_core::ProductId;

use super::{ProductStore, RepositoryError};
use crate::models::{CreateProductRequest, Product};

const COLLECTION: &str = "products";

/// Product repository over the `products` collection.
#[derive(Debug, Clone)]
pub struct MongoProductStore {
    collection: Collection<Product>,
}

impl MongoProductStore {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    async fn find_matching(&self, filter: Document) -> Result<Vec<Product>, RepositoryError> {
        let cursor = self.collection.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        self.find_matching(doc! {}).await
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = self
            .collection
            .find_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(product)
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<ObjectId> = ids.iter().map(ProductId::as_object_id).collect();
        self.find_matching(doc! { "_id": { "$in": ids } }).await
    }

    async fn find_featured(&self) -> Result<Vec<Product>, RepositoryError> {
        self.find_matching(doc! { "isFeatured": true }).await
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
        self.find_matching(doc! { "category": category }).await
    }

    async fn sample(&self, count: u32) -> Result<Vec<Product>, RepositoryError> {
        let pipeline = vec![doc! { "$sample": { "size": i64::from(count) } }];
        let mut cursor = self.collection.aggregate(pipeline).await?;

        let mut products = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            products.push(bson::from_document(document)?);
        }
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
        self.collection.insert_one(&product).await?;
        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn set_featured(
        &self,
        id: ProductId,
        is_featured: bool,
    ) -> Result<Option<Product>, RepositoryError> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": { "isFeatured": is_featured } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }
}
