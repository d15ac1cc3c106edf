// Authentication service - business logic layer

use axum::http::HeaderMap;

use crate::auth::{
    error::AuthError,
    middleware::{bearer_token, AuthenticatedUser},
    models::{AuthResponse, LoginRequest, RegisterRequest},
    password::PasswordService,
    token::{SessionClaims, TokenService},
};
use crate::store::{Criteria, Store, StoreError};
use crate::users::{normalize_email, NewUser, User};

/// Authentication service coordinating credential checks and token issuance
pub struct AuthService {
    users: Store<User>,
    passwords: PasswordService,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(users: Store<User>, passwords: PasswordService, tokens: TokenService) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Exchange credentials for a session token
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&request.email);

        let user = self
            .users
            .find_one(&Criteria::new().eq("email", email.as_str()))
            .await?
            .ok_or_else(|| {
                tracing::warn!("Login attempt for unknown email");
                AuthError::InvalidCredentials
            })?;

        if !self.passwords.verify(&request.password, &user.password_hash).await? {
            tracing::warn!("Login attempt with wrong password for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!("User {} logged in", user.id);
        self.respond_with_token(user)
    }

    /// Create a user and sign them in
    ///
    /// This method:
    /// 1. Normalizes the email
    /// 2. Checks that it is not registered yet
    /// 3. Hashes the password and inserts the user
    /// 4. Issues a session token
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        // 1. Normalize
        let email = normalize_email(&request.email);

        // 2. Uniqueness
        if self.users.exists(&Criteria::new().eq("email", email.as_str())).await? {
            tracing::warn!("Registration attempt with existing email");
            return Err(AuthError::EmailTaken);
        }

        // 3. Hash and insert; a concurrent registration can still win the race
        let password_hash = self.passwords.hash(&request.password).await?;
        let user = self
            .users
            .insert(NewUser {
                name: request.name.trim().to_string(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Store(other),
            })?;

        // 4. Token
        tracing::info!("Registered user {}", user.id);
        self.respond_with_token(user)
    }

    /// Resolve the caller from the Authorization header
    ///
    /// The token must verify and its subject must still exist.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
        let token = bearer_token(headers)?;
        let claims = self.tokens.decode(token)?;

        let user = self
            .users
            .find_by_id(claims.session.sub)
            .await?
            .ok_or(AuthError::SubjectGone)?;

        Ok(AuthenticatedUser {
            user_id: user.id,
            name: user.name,
            email: user.email,
        })
    }

    fn respond_with_token(&self, user: User) -> Result<AuthResponse, AuthError> {
        let access_token = self.tokens.issue(SessionClaims::for_user(&user))?;

        Ok(AuthResponse {
            access_token,
            data: user.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashCost;
    use crate::db::test_support::{test_pool, unique_email};
    use axum::http::{header, HeaderValue};
    use chrono::{Duration, Utc};
    use sqlx::PgPool;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn service(pool: &PgPool) -> AuthService {
        let passwords = PasswordService::new(HashCost {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        AuthService::new(
            Store::new(pool.clone()),
            passwords,
            TokenService::new(SECRET, Duration::days(1)),
        )
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_register_then_login_case_insensitive() {
        let Some(pool) = test_pool().await else { return };
        let service = service(&pool);
        let email = unique_email("Login");

        let registered = service.register(register_request(&email.to_uppercase())).await.unwrap();
        assert_eq!(registered.data.email, email.to_lowercase());

        let logged_in = service
            .login(LoginRequest {
                email: email.to_uppercase(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.data.id, registered.data.id);
    }

    #[tokio::test]
    async fn test_register_same_email_any_case_is_taken() {
        let Some(pool) = test_pool().await else { return };
        let service = service(&pool);
        let email = unique_email("dup");

        service.register(register_request(&email)).await.unwrap();
        let again = service.register(register_request(&email.to_uppercase())).await;

        assert!(matches!(again, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_fail_alike() {
        let Some(pool) = test_pool().await else { return };
        let service = service(&pool);
        let email = unique_email("creds");
        service.register(register_request(&email)).await.unwrap();

        let wrong_password = service
            .login(LoginRequest {
                email: email.clone(),
                password: "not-the-password".to_string(),
            })
            .await;
        let unknown_email = service
            .login(LoginRequest {
                email: unique_email("ghost"),
                password: "secret1".to_string(),
            })
            .await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_subject() {
        let Some(pool) = test_pool().await else { return };
        let service = service(&pool);
        let registered = service.register(register_request(&unique_email("auth"))).await.unwrap();

        let user = service.authenticate(&bearer(&registered.access_token)).await.unwrap();

        assert_eq!(user.user_id, registered.data.id);
        assert_eq!(user.email, registered.data.email);
    }

    #[tokio::test]
    async fn test_deleted_subject_is_rejected() {
        let Some(pool) = test_pool().await else { return };
        let service = service(&pool);
        let registered = service.register(register_request(&unique_email("gone"))).await.unwrap();

        Store::<User>::new(pool.clone()).destroy(registered.data.id).await.unwrap();

        let result = service.authenticate(&bearer(&registered.access_token)).await;
        assert!(matches!(result, Err(AuthError::SubjectGone)));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected_before_lookup() {
        let Some(pool) = test_pool().await else { return };
        let service = service(&pool);
        let registered = service.register(register_request(&unique_email("old"))).await.unwrap();
        let user = Store::<User>::new(pool.clone())
            .find_by_id(registered.data.id)
            .await
            .unwrap()
            .unwrap();

        let stale = service
            .tokens
            .issue_at(SessionClaims::for_user(&user), Utc::now() - Duration::days(2))
            .unwrap();

        let result = service.authenticate(&bearer(&stale)).await;
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }
}
