/// JWT authentication extractor
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AuthError;
use crate::models::AuthenticatedAccount;
use crate::services::AuthService;

/// Pull the token out of `Authorization: Bearer <token>`
pub fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::NotAuthenticated)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::NotAuthenticated)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    AuthService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        AuthService::from_ref(state).authenticate(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/auth/users/me");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_or_wrong_scheme_is_not_authenticated() {
        for header in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer "), Some("bearer abc")] {
            let parts = parts_with(header);
            assert!(
                matches!(bearer_token(&parts), Err(AuthError::NotAuthenticated)),
                "{header:?}"
            );
        }
    }
}
