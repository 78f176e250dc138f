//! User account model and signup validation.

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tamarind_core::{Email, ProductId, Role, UserId};

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A user account document in the `users` collection.
///
/// `password_hash` is a bcrypt hash, written exactly once when the account
/// is created. It never appears in API responses; handlers project through
/// [`UserProfile`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub role: Role,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// A cart line embedded in the user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// A cart line as returned to clients (hex-string product id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product: String,
    pub quantity: u32,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product: item.product.to_hex(),
            quantity: item.quantity,
        }
    }
}

/// Fields required to create a new account.
///
/// The password arrives here already hashed; repositories never see
/// plaintext credentials.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
}

/// The safe projection of a [`User`] returned by every auth endpoint.
///
/// Matches the stored document minus the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub cart_items: Vec<CartItemView>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            cart_items: user.cart_items.iter().map(CartItemView::from).collect(),
        }
    }
}

/// A single failed field from signup validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate raw signup input, returning the normalized email on success.
///
/// All fields are checked so the client gets every problem in one response
/// rather than one per round trip.
///
/// # Errors
///
/// Returns one [`FieldError`] per failed field.
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
) -> Result<Email, Vec<FieldError>> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "Name is required".to_string(),
        });
    }

    let parsed = match Email::parse(email) {
        Ok(email) => Some(email),
        Err(e) => {
            errors.push(FieldError {
                field: "email",
                message: e.to_string(),
            });
            None
        }
    };

    if password.len() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError {
            field: "password",
            message: format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        });
    }

    match (parsed, errors.is_empty()) {
        (Some(email), true) => Ok(email),
        _ => Err(errors),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: UserId::new(),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            password_hash: "$2b$10$hash".to_string(),
            cart_items: vec![CartItem {
                product: ProductId::new(),
                quantity: 2,
            }],
            role: Role::Customer,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_excludes_password_hash() {
        let user = sample_user();
        let profile = UserProfile::from(&user);
        let json = serde_json::to_value(&profile).unwrap();

        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["_id"], user.id.to_hex());
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["role"], "customer");
    }

    #[test]
    fn test_profile_cart_items_use_hex_ids() {
        let user = sample_user();
        let profile = UserProfile::from(&user);
        let json = serde_json::to_value(&profile).unwrap();

        let items = json["cartItems"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["product"], user.cart_items[0].product.to_hex());
        assert_eq!(items[0]["quantity"], 2);
    }

    #[test]
    fn test_cart_item_quantity_defaults_to_one() {
        let item: CartItem =
            serde_json::from_value(serde_json::json!({ "product": ProductId::new() })).unwrap();
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_validate_signup_ok_normalizes_email() {
        let email = validate_signup("Ada", " Ada@Example.COM ", "secret123").unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_validate_signup_collects_all_errors() {
        let errors = validate_signup("", "not-an-email", "short").unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }

    #[test]
    fn test_validate_signup_short_password() {
        let errors = validate_signup("Ada", "ada@example.com", "12345").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
    }
}
