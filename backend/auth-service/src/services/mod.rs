/// Business logic services
pub mod auth_service;
pub mod refresh_tokens;
pub mod token_reaper;

pub use auth_service::AuthService;
pub use refresh_tokens::RefreshTokenStore;
pub use token_reaper::spawn_token_reaper;
