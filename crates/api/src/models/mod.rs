//! Domain models for the store.
//!
//! Each model comes in two shapes: the document stored in MongoDB (typed
//! ids, BSON datetimes) and the wire DTO returned to clients (hex-string
//! ids, camelCase fields).

pub mod product;
pub mod user;

pub use product::{CreateProductRequest, Product, ProductResponse};
pub use user::{CartItem, CartItemView, FieldError, NewUser, User, UserProfile, validate_signup};
