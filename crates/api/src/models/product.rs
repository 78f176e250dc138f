//! Product catalog model.

use serde::{Deserialize, Serialize};
use tamarind_core::{Price, ProductId};

use super::FieldError;

/// A product document in the `products` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub is_featured: bool,
}

/// A product as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    pub is_featured: bool,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_hex(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
            is_featured: product.is_featured,
        }
    }
}

/// Payload for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
}

impl CreateProductRequest {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per failed field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError {
                field: "name",
                message: "Name is required".to_string(),
            });
        }
        if self.description.trim().is_empty() {
            errors.push(FieldError {
                field: "description",
                message: "Description is required".to_string(),
            });
        }
        if self.price.is_negative() {
            errors.push(FieldError {
                field: "price",
                message: "Price must not be negative".to_string(),
            });
        }
        if self.category.trim().is_empty() {
            errors.push(FieldError {
                field: "category",
                message: "Category is required".to_string(),
            });
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
