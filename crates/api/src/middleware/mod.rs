//! Request guards and session cookie handling.

pub mod auth;
pub mod session;

pub use auth::{CurrentUser, RequireAdmin};
pub use session::{
    ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME, attach_access_cookie, attach_session_cookies,
    clear_session_cookies,
};
