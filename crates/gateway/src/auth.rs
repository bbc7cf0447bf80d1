//! Access-token and password primitives.
//!
//! HS256 JWTs built from hmac + sha2 + base64 — no signing library. Tokens
//! carry `{user_id, email, type: "access", iat, exp}` and expire after one
//! hour. Passwords are bcrypt-hashed.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use interdesk_core::AuthError;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Access-token lifetime in seconds.
const ACCESS_TOKEN_EXPIRY_SECS: i64 = 3600;

/// The claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

fn sign(secret: &str, input: &str) -> Result<Vec<u8>, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AuthError::InvalidToken(format!("bad HMAC key: {e}")))?;
    mac.update(input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Issue an HS256 access token for a user.
pub fn issue_access_token(secret: &str, user_id: i64, email: &str) -> Result<String, AuthError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        user_id,
        email: email.to_string(),
        token_type: "access".into(),
        iat: now,
        exp: now + ACCESS_TOKEN_EXPIRY_SECS,
    };

    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::to_string(&claims)
            .map_err(|e| AuthError::InvalidToken(format!("claims encoding: {e}")))?,
    );
    let signing_input = format!("{header}.{payload}");
    let signature = URL_SAFE_NO_PAD.encode(sign(secret, &signing_input)?);

    Ok(format!("{signing_input}.{signature}"))
}

/// Verify an access token: signature, type, and expiry.
pub fn verify_access_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::InvalidToken("expected three segments".into()));
    };

    let signing_input = format!("{header}.{payload}");
    let expected = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|e| AuthError::InvalidToken(format!("signature encoding: {e}")))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AuthError::InvalidToken(format!("bad HMAC key: {e}")))?;
    mac.update(signing_input.as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| AuthError::InvalidToken("signature mismatch".into()))?;

    let claims_json = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AuthError::InvalidToken(format!("payload encoding: {e}")))?;
    let claims: Claims = serde_json::from_slice(&claims_json)
        .map_err(|e| AuthError::InvalidToken(format!("claims decoding: {e}")))?;

    if claims.token_type != "access" {
        return Err(AuthError::InvalidToken("invalid token type".into()));
    }
    if claims.exp <= chrono::Utc::now().timestamp() {
        return Err(AuthError::TokenExpired);
    }

    Ok(claims)
}

/// Extract the token from an Authorization header value.
/// Accepts both `Bearer <token>` and a bare token.
pub fn bearer_token(header_value: &str) -> &str {
    header_value.strip_prefix("Bearer ").unwrap_or(header_value)
}

/// Bcrypt-hash a password.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a password against its stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-signing-secret";

    #[test]
    fn issued_token_verifies() {
        let token = issue_access_token(SECRET, 42, "a@intercloud.com.bd").unwrap();
        let claims = verify_access_token(SECRET, &token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "a@intercloud.com.bd");
        assert_eq!(claims.token_type, "access");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_access_token(SECRET, 1, "a@x").unwrap();
        let err = verify_access_token("other-secret", &token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = issue_access_token(SECRET, 1, "a@x").unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(
            r#"{"user_id":999,"email":"a@x","type":"access","iat":0,"exp":9999999999}"#,
        );
        parts[1] = &forged;
        let tampered = parts.join(".");
        assert!(verify_access_token(SECRET, &tampered).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_access_token(SECRET, "not-a-token").is_err());
    }

    #[test]
    fn bearer_prefix_is_optional() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(bearer_token("abc.def.ghi"), "abc.def.ghi");
    }

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }
}
