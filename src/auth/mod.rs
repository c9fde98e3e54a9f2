//! Credential verification and bearer tokens
//!
//! Login goes through a pluggable `CredentialVerifier`; tokens are HS256
//! JWTs valid for 24 hours.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::Result;

pub const DEMO_USER_ID: &str = "user-1";
const DEMO_EMAIL: &str = "admin@doflow.com";
const DEMO_PASSWORD: &str = "password123";
const TOKEN_TTL_HOURS: i64 = 24;

/// Authenticated identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
}

/// Checks an identifier/secret pair
#[async_trait::async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, identifier: &str, secret: &str) -> Result<Principal>;
}

/// The single hard-coded demo account
pub struct DemoCredentialVerifier;

#[async_trait::async_trait]
impl CredentialVerifier for DemoCredentialVerifier {
    async fn verify(&self, identifier: &str, secret: &str) -> Result<Principal> {
        let known_identifier = identifier == DEMO_EMAIL || identifier == "admin";

        if known_identifier && secret == DEMO_PASSWORD {
            return Ok(demo_principal());
        }

        warn!(identifier = %identifier, "Rejected login attempt");
        Err(ServiceError::Auth("Credenziali non valide".to_string()))
    }
}

pub fn demo_principal() -> Principal {
    Principal {
        id: DEMO_USER_ID.to_string(),
        email: Some(DEMO_EMAIL.to_string()),
        first_name: Some("Admin".to_string()),
        last_name: Some("User".to_string()),
        role: "admin".to_string(),
    }
}

/// Token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub email: Option<String>,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates bearer tokens
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::hours(TOKEN_TTL_HOURS))
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, principal: &Principal) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id: principal.id.clone(),
            email: principal.email.clone(),
            role: principal.role.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ServiceError::Token(format!("Failed to sign token: {}", e)))
    }

    /// Validate a raw `Authorization` header value
    pub fn validate_header(&self, header: Option<&str>) -> Result<Claims> {
        let raw = header.map(str::trim).filter(|h| !h.is_empty());
        let Some(raw) = raw else {
            return Err(ServiceError::Auth("Token is missing!".to_string()));
        };

        let token = raw.strip_prefix("Bearer ").map(str::trim).unwrap_or(raw);
        self.validate(token)
    }

    pub fn validate(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(error = %err, "Token rejected");
                match err.kind() {
                    ErrorKind::ExpiredSignature => {
                        ServiceError::Auth("Token has expired!".to_string())
                    }
                    _ => ServiceError::Auth("Token is invalid!".to_string()),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_message(result: Result<Claims>) -> String {
        match result {
            Err(ServiceError::Auth(message)) => message,
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_demo_verifier() {
        let verifier = DemoCredentialVerifier;

        let principal = verifier.verify("admin@doflow.com", "password123").await.unwrap();
        assert_eq!(principal.id, DEMO_USER_ID);
        assert!(verifier.verify("admin", "password123").await.is_ok());
        assert!(verifier.verify("admin", "wrong").await.is_err());
        assert!(verifier.verify("someone@else.com", "password123").await.is_err());
    }

    #[test]
    fn test_issue_and_validate() {
        let issuer = TokenIssuer::new("secret");
        let token = issuer.issue(&demo_principal()).unwrap();

        let claims = issuer
            .validate_header(Some(&format!("Bearer {}", token)))
            .unwrap();
        assert_eq!(claims.user_id, DEMO_USER_ID);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);

        // Bare tokens without the prefix are accepted too
        assert!(issuer.validate_header(Some(&token)).is_ok());
    }

    #[test]
    fn test_rejections() {
        let issuer = TokenIssuer::new("secret");

        assert_eq!(auth_message(issuer.validate_header(None)), "Token is missing!");
        assert_eq!(
            auth_message(issuer.validate_header(Some("Bearer nonsense"))),
            "Token is invalid!"
        );

        let other = TokenIssuer::new("other-secret");
        let foreign = other.issue(&demo_principal()).unwrap();
        assert_eq!(auth_message(issuer.validate(&foreign)), "Token is invalid!");

        let expired = TokenIssuer::with_ttl("secret", Duration::hours(-1))
            .issue(&demo_principal())
            .unwrap();
        assert_eq!(auth_message(issuer.validate(&expired)), "Token has expired!");
    }
}
