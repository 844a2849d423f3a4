pub mod account_repo;
pub mod memory;
pub mod token_repo;

pub use account_repo::{AccountRepository, PgAccountRepository};
pub use memory::{InMemoryAccountRepository, InMemoryRefreshTokenRepository};
pub use token_repo::{PgRefreshTokenRepository, RefreshTokenRepository};
