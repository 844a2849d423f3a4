/// HTTP request handlers (REST API)
pub mod auth;
pub mod users;

// Re-export handlers for easy access
pub use auth::{login, logout, refresh_token, register};
pub use users::{delete_me, get_me, update_me};
