// JWT session token generation and validation service

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::users::User;

/// Identity carried inside a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid, // user_id
    pub name: String,
    pub email: String,
    /// Hash at issuance time
    pub password_hash: String,
}

impl SessionClaims {
    pub fn for_user(user: &User) -> Self {
        Self {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub session: SessionClaims,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

/// Token service for JWT operations
///
/// HS256 with a shared secret. Expiry is checked with zero leeway and
/// tokens cannot be revoked before they expire.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Create a new TokenService with secret key and token lifetime
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Sign a token for `session`, valid for the configured ttl from now
    pub fn issue(&self, session: SessionClaims) -> Result<String, AuthError> {
        self.issue_at(session, Utc::now())
    }

    pub(crate) fn issue_at(&self, session: SessionClaims, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            session,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry and return the claims
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_token_service() -> TokenService {
        TokenService::new(SECRET, Duration::days(1))
    }

    fn session(name: &str, email: &str) -> SessionClaims {
        SessionClaims {
            sub: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".to_string(),
        }
    }

    #[test]
    fn test_decode_returns_issued_claims() {
        let service = test_token_service();
        let claims = session("Ana", "ana@x.com");

        let token = service.issue(claims.clone()).unwrap();
        let decoded = service.decode(&token).unwrap();

        assert_eq!(decoded.session, claims);
        assert_eq!(decoded.exp - decoded.iat, Duration::days(1).num_seconds());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = test_token_service();
        let issued_at = Utc::now() - Duration::days(1) - Duration::seconds(10);

        let token = service.issue_at(session("Ana", "ana@x.com"), issued_at).unwrap();

        assert!(matches!(service.decode(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1", Duration::days(1));
        let service2 = TokenService::new("secret2", Duration::days(1));

        let token = service1.issue(session("Ana", "ana@x.com")).unwrap();

        assert!(service1.decode(&token).is_ok());
        assert!(matches!(service2.decode(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        for token in [
            "",
            "not.a.token",
            "invalid_token_format",
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature",
        ] {
            assert!(matches!(service.decode(token), Err(AuthError::InvalidToken)));
        }
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = test_token_service();
        let token = service.issue(session("Ana", "ana@x.com")).unwrap();
        let other = service.issue(session("Bob", "bob@x.com")).unwrap();

        // Header and signature from one token, payload from another
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(matches!(service.decode(&forged), Err(AuthError::InvalidToken)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_claims_round_trip(name in "[A-Za-z ]{1,40}", local in "[a-z0-9]{1,20}") {
            let service = test_token_service();
            let claims = session(&name, &format!("{}@example.com", local));

            let token = service.issue(claims.clone()).unwrap();
            prop_assert_eq!(service.decode(&token).unwrap().session, claims);
        }
    }
}
