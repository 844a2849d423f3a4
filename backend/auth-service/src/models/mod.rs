/// Data models for authentication
pub mod account;
pub mod token;

pub use account::{
    Account, AccountId, AccountProfile, AuthenticatedAccount, LoginRequest, NewAccount,
    RegisterRequest, UpdateProfileRequest,
};
pub use token::{RefreshTokenRecord, RefreshTokenRequest, RotatedToken, TokenPair};
