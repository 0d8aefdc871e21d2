//! Access and refresh token issuance.
//!
//! Tokens are HS256 JWTs signed with a shared secret from [`AuthConfig`].
//! The issuer is constructed once at startup and handed to the server state;
//! nothing here reads ambient globals.

use crate::config::AuthConfig;
use crate::domain::UserRole;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Claims carried by a short-lived access token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user id.
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Claims carried by a long-lived refresh token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    /// Always `"refresh"`; distinguishes the two token kinds.
    pub kind: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies bearer tokens for the session layer.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl TokenIssuer {
    /// Build an issuer from configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    /// Access token lifetime in seconds, surfaced in the login response.
    pub fn access_ttl_secs(&self) -> u64 {
        self.access_ttl_secs
    }

    /// Issue an access token embedding the user's id, email, and role.
    pub fn issue_access(&self, user_id: Uuid, email: &str, role: UserRole) -> crate::Result<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = AccessClaims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + self.access_ttl_secs as i64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| crate::Error::InvalidToken(e.to_string()))
    }

    /// Issue a refresh token embedding only the subject.
    pub fn issue_refresh(&self, user_id: Uuid) -> crate::Result<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = RefreshClaims {
            sub: user_id,
            kind: "refresh".to_string(),
            iat: now,
            exp: now + self.refresh_ttl_secs as i64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| crate::Error::InvalidToken(e.to_string()))
    }

    /// Verify an access token's signature and expiry and return its claims.
    pub fn verify_access(&self, token: &str) -> crate::Result<AccessClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: an expired credential is rejected at the expiry instant.
        validation.leeway = 0;

        decode::<AccessClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => crate::Error::TokenExpired,
                _ => crate::Error::InvalidToken(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig::for_testing())
    }

    #[test]
    fn test_access_token_roundtrip() {
        let issuer = test_issuer();
        let user_id = Uuid::new_v4();
        let token = issuer
            .issue_access(user_id, "jane.kimani@knh.org", UserRole::LabAdmin)
            .unwrap();

        let claims = issuer.verify_access(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "jane.kimani@knh.org");
        assert_eq!(claims.role, UserRole::LabAdmin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = test_issuer();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = AccessClaims {
            sub: Uuid::new_v4(),
            email: "x@example.org".to_string(),
            role: UserRole::Researcher,
            iat: now - 120,
            exp: now - 60,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &issuer.encoding).unwrap();

        match issuer.verify_access(&token) {
            Err(crate::Error::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = test_issuer();
        let token = issuer
            .issue_access(Uuid::new_v4(), "x@example.org", UserRole::Observer)
            .unwrap();

        let other = TokenIssuer::new(&AuthConfig {
            secret: "a-different-secret".to_string(),
            ..AuthConfig::for_testing()
        });
        assert!(other.verify_access(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = test_issuer();
        let mut token = issuer
            .issue_access(Uuid::new_v4(), "x@example.org", UserRole::Observer)
            .unwrap();
        token.push('x');
        assert!(issuer.verify_access(&token).is_err());
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let issuer = test_issuer();
        let token = issuer.issue_refresh(Uuid::new_v4()).unwrap();
        // Refresh claims lack the access fields, so access verification fails.
        assert!(issuer.verify_access(&token).is_err());
    }
}
