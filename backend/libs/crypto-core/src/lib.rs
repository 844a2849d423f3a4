//! Cryptographic primitives shared by the auth service
//!
//! - `jwt`: HS512 access token signer
//! - `token`: opaque refresh token generation and at-rest digest
//! - `hash`: SHA256 helpers

pub mod hash;
pub mod jwt;
pub mod token;

pub use jwt::{Claims, JwtError, JwtSigner};
pub use token::{generate_refresh_token, refresh_token_digest};
