/// Access token signing and verification for the auth service
///
/// Tokens are HS512-signed JWTs carrying `{sub, iss, iat, exp}`. The subject is
/// a numeric account id rendered as a decimal string.
///
/// ## Security Design
///
/// - **HS512 ONLY**: the header algorithm is checked before the signature, so
///   `none`, HS256 and asymmetric algorithms are rejected up front
/// - **Explicit keys**: a `JwtSigner` owns its key material; there is no
///   process-global key cell
/// - **Zero leeway**: a token is expired the second its `exp` passes
///
/// ## Usage
///
/// ```rust
/// use chrono::Duration;
/// use crypto_core::jwt::JwtSigner;
///
/// let signer = JwtSigner::new(
///     b"0123456789abcdef0123456789abcdef",
///     "auth-service",
///     Duration::minutes(30),
/// )
/// .unwrap();
///
/// let token = signer.issue(42).unwrap();
/// assert_eq!(signer.verify(&token).unwrap(), 42);
/// ```
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Issuer claim stamped on every access token unless configured otherwise
pub const DEFAULT_ISSUER: &str = "auth-service";

pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 30;

/// Shortest accepted HMAC secret (256 bits)
pub const MIN_SECRET_LENGTH: usize = 32;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;
const JWT_ALGORITHM_NAME: &str = "HS512";

// ============================================================================
// Data Structures
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("malformed token")]
    MalformedToken,

    #[error("signing secret is {0} bytes, at least {MIN_SECRET_LENGTH} required")]
    WeakSecret(usize),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Registered claims carried by an access token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account id as decimal string)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Issues and verifies access tokens with a single symmetric secret
#[derive(Clone)]
pub struct JwtSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSigner")
            .field("algorithm", &JWT_ALGORITHM_NAME)
            .field("issuer", &self.issuer)
            .field("ttl_seconds", &self.ttl.num_seconds())
            .field("secret", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Construction
// ============================================================================

impl JwtSigner {
    /// Build a signer from raw secret bytes
    ///
    /// ## Errors
    ///
    /// Returns `JwtError::WeakSecret` if the secret is shorter than
    /// `MIN_SECRET_LENGTH` bytes.
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(JwtError::WeakSecret(secret.len()));
        }

        let issuer = issuer.into();

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer,
            ttl,
        })
    }

    /// Lifetime of every token this signer issues
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

// ============================================================================
// Issuance
// ============================================================================

impl JwtSigner {
    /// Issue an access token for `subject`, valid from now for the configured TTL
    pub fn issue(&self, subject: i64) -> Result<String, JwtError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue an access token as if it were minted at `issued_at`
    ///
    /// ## Errors
    ///
    /// `JwtError::Signing` if `issued_at + ttl` falls outside the representable
    /// date range.
    pub fn issue_at(&self, subject: i64, issued_at: DateTime<Utc>) -> Result<String, JwtError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| JwtError::Signing("token expiry out of range".to_string()))?;

        let claims = Claims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }
}

// ============================================================================
// Verification
// ============================================================================

impl JwtSigner {
    /// Verify a token and return its subject
    ///
    /// ## Errors
    ///
    /// - `InvalidSignature` if the header names another algorithm or the
    ///   signature does not match this signer's secret
    /// - `Expired` if `exp` has passed
    /// - `MalformedToken` for anything unparseable, a foreign issuer, or a
    ///   subject that is not a positive integer
    pub fn verify(&self, token: &str) -> Result<i64, JwtError> {
        let claims = self.decode_claims(token)?;
        parse_subject(&claims.sub)
    }

    /// Verify a token and return its full claim set
    pub fn decode_claims(&self, token: &str) -> Result<Claims, JwtError> {
        ensure_expected_algorithm(token)?;

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(classify)
    }
}

fn ensure_expected_algorithm(token: &str) -> Result<(), JwtError> {
    let segment = token
        .split('.')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(JwtError::MalformedToken)?;

    let raw = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| JwtError::MalformedToken)?;
    let header: RawHeader = serde_json::from_slice(&raw).map_err(|_| JwtError::MalformedToken)?;

    if header.alg == JWT_ALGORITHM_NAME {
        Ok(())
    } else {
        Err(JwtError::InvalidSignature)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> JwtError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::MalformedToken,
    }
}

fn parse_subject(sub: &str) -> Result<i64, JwtError> {
    sub.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(JwtError::MalformedToken)
}

// ============================================================================
// Tests
// ============================================================================
