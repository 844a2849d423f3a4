/// Security module for authentication
/// Provides password hashing; token signing lives in the shared crypto-core library

pub use crypto_core::jwt::JwtSigner;

pub mod password;
