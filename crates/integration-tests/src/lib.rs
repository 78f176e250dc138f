//! Integration test harness for Tamarind.
//!
//! Drives the real router in process with the in-memory stores, so the full
//! HTTP surface (routing, extractors, cookies, error bodies) is exercised
//! without MongoDB or Redis.
//!
//! ```rust,ignore
//! let app = TestApp::new();
//! let resp = app.signup("Ada", "ada@example.com", "hunter22").await;
//! assert_eq!(resp.status, StatusCode::CREATED);
//! let cookies = resp.cookie_header();
//! let profile = app.get("/api/auth/profile", Some(&cookies)).await;
//! ```

use std::net::IpAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use tamarind_core::{Price, ProductId, UserId};
use tower::ServiceExt;

use tamarind_api::cache::MemoryCache;
use tamarind_api::config::{ApiConfig, Environment};
use tamarind_api::db::{MemoryProductStore, MemoryUserStore, ProductStore, UserStore};
use tamarind_api::models::Product;
use tamarind_api::routes;
use tamarind_api::services::auth::Claims;
use tamarind_api::state::AppState;

/// Low bcrypt cost keeps the suites fast.
const TEST_BCRYPT_COST: u32 = 4;

fn test_access_secret() -> String {
    "a".repeat(32)
}

fn test_config() -> ApiConfig {
    ApiConfig {
        mongo_uri: SecretString::from("mongodb://localhost:27017"),
        mongo_db: "tamarind_test".to_string(),
        redis_url: SecretString::from("redis://localhost:6379"),
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        access_token_secret: SecretString::from(test_access_secret()),
        refresh_token_secret: SecretString::from("b".repeat(32)),
        bcrypt_cost: TEST_BCRYPT_COST,
        environment: Environment::Development,
        sentry_dsn: None,
    }
}

/// The application plus handles to its in-memory backing stores.
pub struct TestApp {
    router: Router,
    pub users: Arc<MemoryUserStore>,
    pub products: Arc<MemoryProductStore>,
    pub cache: Arc<MemoryCache>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let products = Arc::new(MemoryProductStore::new());
        let cache = Arc::new(MemoryCache::new());

        let state = AppState::new(
            test_config(),
            Arc::clone(&users) as Arc<dyn UserStore>,
            Arc::clone(&products) as Arc<dyn ProductStore>,
            Arc::clone(&cache) as Arc<dyn tamarind_api::cache::KeyValueStore>,
        );

        Self {
            router: routes::router(state),
            users,
            products,
            cache,
        }
    }

    /// Send a request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the response body is not
    /// JSON (an empty body reads as `Value::Null`).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookies: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookies) = cookies {
            builder = builder.header(COOKIE, cookies);
        }

        let request = match body {
            Some(value) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not JSON")
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookies: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, cookies).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookies: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), cookies).await
    }

    pub async fn put(&self, uri: &str, body: Value, cookies: Option<&str>) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), cookies).await
    }

    pub async fn patch(&self, uri: &str, cookies: Option<&str>) -> TestResponse {
        self.request(Method::PATCH, uri, None, cookies).await
    }

    pub async fn delete(&self, uri: &str, body: Value, cookies: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, Some(body), cookies).await
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.post(
            "/api/auth/signup",
            json!({ "name": name, "email": email, "password": password }),
            None,
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
            None,
        )
        .await
    }

    /// Sign up and return the session cookie header plus the profile body.
    ///
    /// # Panics
    ///
    /// Panics if signup does not return 201.
    pub async fn signup_session(&self, name: &str, email: &str) -> (String, Value) {
        let resp = self.signup(name, email, "hunter22").await;
        assert_eq!(resp.status, StatusCode::CREATED, "signup failed: {:?}", resp.body);
        (resp.cookie_header(), resp.body)
    }

    /// Sign up an account and flip it to admin.
    ///
    /// # Panics
    ///
    /// Panics if signup fails or the returned id is malformed.
    pub async fn signup_admin_session(&self, name: &str, email: &str) -> String {
        let (cookies, profile) = self.signup_session(name, email).await;
        let id = UserId::parse(profile["_id"].as_str().expect("profile has _id"))
            .expect("profile id parses");
        self.users.promote_to_admin(id);
        cookies
    }

    /// Sign an access token with the app's access secret and the given
    /// claims, for presenting aged or otherwise odd tokens to the guard.
    ///
    /// # Panics
    ///
    /// Panics if signing fails.
    #[must_use]
    pub fn sign_access_token(&self, claims: &Claims) -> String {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
            claims,
            &jsonwebtoken::EncodingKey::from_secret(test_access_secret().as_bytes()),
        )
        .expect("token signs")
    }

    /// Seed one product into the catalog, returning it.
    pub fn seed_product(&self, name: &str, category: &str, cents: i64, featured: bool) -> Product {
        let product = Product {
            id: ProductId::new(),
            name: name.to_string(),
            description: format!("{name} description"),
            price: Price::from_cents(cents),
            image: String::new(),
            category: category.to_string(),
            is_featured: featured,
        };
        self.products.seed(vec![product.clone()]);
        product
    }
}

/// A decoded response: status, headers, and JSON body.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// All `Set-Cookie` header values.
    #[must_use]
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect()
    }

    /// The `Set-Cookie` entry for a cookie name, if any.
    #[must_use]
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies()
            .into_iter()
            .find(|c| c.starts_with(&prefix))
    }

    /// The value set for a cookie name, if any.
    #[must_use]
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        let raw = self.set_cookie(name)?;
        let pair = raw.split(';').next()?;
        let (_, value) = pair.split_once('=')?;
        Some(value.to_string())
    }

    /// Build a `Cookie` request header from everything this response set.
    ///
    /// Expired cookies (Max-Age=0) are dropped, mirroring a browser.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        self.set_cookies()
            .iter()
            .filter(|c| !c.contains("Max-Age=0"))
            .filter_map(|c| c.split(';').next())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// The `message` field of the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the body has no string `message`.
    #[must_use]
    pub fn message(&self) -> &str {
        self.body["message"]
            .as_str()
            .expect("body has a message field")
    }
}
