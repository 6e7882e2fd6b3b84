//! Request authentication.
//!
//! Callers authenticate with the short-lived backend token minted from
//! their identity-provider session. The extractor pulls the subject out of
//! the bearer token and keeps the raw token so handlers can forward it to
//! the data layer, where row-level security enforces authorization. The
//! API itself only checks the token is well-formed and unexpired.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use jb_postgrest::AccessToken;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity-provider user id (the token subject)
    pub user_id: String,
    token: String,
}

impl AuthUser {
    /// The caller's token, wrapped for the data layer.
    pub fn access_token(&self) -> ApiResult<AccessToken> {
        Ok(AccessToken::new(self.token.clone())?)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("malformed authorization header"))?;

        let claims = decode_claims(token)?;
        if claims.sub.trim().is_empty() {
            return Err(ApiError::unauthorized("token has no subject"));
        }

        Ok(AuthUser {
            user_id: claims.sub,
            token: token.to_string(),
        })
    }
}

/// Decode the token claims. The signature is verified by the backend the
/// token is forwarded to; here we check shape and expiry only.
fn decode_claims(token: &str) -> ApiResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = true;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["sub", "exp"]);

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| ApiError::unauthorized(format!("invalid session token: {}", e)))?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn make_token(sub: &str, exp_offset_secs: i64) -> String {
        let exp = chrono::Utc::now().timestamp() + exp_offset_secs;
        let claims = json!({ "sub": sub, "exp": exp, "role": "authenticated" });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"irrelevant"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_extracts_subject() {
        let token = make_token("user_123", 300);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "user_123");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = make_token("user_123", -300);
        assert!(decode_claims(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(decode_claims("not-a-jwt").is_err());
    }
}
