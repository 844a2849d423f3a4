/// Opaque refresh token material
///
/// Refresh tokens carry no claims. They are random strings that only mean
/// something to the store that issued them. Stores key rows by the digest,
/// so a leaked table does not hand out usable tokens.
use rand::{rngs::OsRng, RngCore};

use crate::hash::sha256_hex;

/// Entropy per refresh token in bytes (256 bits)
pub const REFRESH_TOKEN_BYTES: usize = 32;

pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Generate a new refresh token: 32 bytes from the OS RNG, hex encoded
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Lookup key under which a refresh token is persisted
pub fn refresh_token_digest(token: &str) -> String {
    sha256_hex(token.as_bytes())
}
