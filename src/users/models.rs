// User data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::addresses::Address;
use crate::store::{Entity, Value};
use crate::validation::validate_not_blank;

/// Emails are stored lowercased; every lookup and write goes through this
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload, already normalized and hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const NAME: &'static str = "User";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "password_hash",
        "created_at",
        "updated_at",
    ];

    type New = NewUser;
    type Patch = UserPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn insert_values(new: NewUser) -> Vec<(&'static str, Value)> {
        vec![
            ("name", Value::Text(new.name)),
            ("email", Value::Text(new.email)),
            ("password_hash", Value::Text(new.password_hash)),
        ]
    }

    fn merge(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
    }

    fn update_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", Value::Text(self.name.clone())),
            ("email", Value::Text(self.email.clone())),
            ("password_hash", Value::Text(self.password_hash.clone())),
        ]
    }
}

/// User response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "Ana")]
    pub name: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// The current user together with the addresses they own
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserResponse,
    pub addresses: Vec<Address>,
}

/// Profile update request DTO; every field optional
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(
        length(max = 100, message = "Name must not exceed 100 characters."),
        custom = "validate_not_blank"
    )]
    pub name: Option<String>,

    #[validate(
        email(message = "Invalid email format."),
        length(max = 150, message = "Email must not exceed 150 characters.")
    )]
    pub email: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@X.COM "), "ana@x.com");
    }

    #[test]
    fn test_merge_changes_only_supplied_fields() {
        let mut user = sample_user();
        let original = user.clone();

        user.merge(UserPatch {
            name: Some("Ana Maria".to_string()),
            ..UserPatch::default()
        });

        assert_eq!(user.name, "Ana Maria");
        assert_eq!(user.email, original.email);
        assert_eq!(user.password_hash, original.password_hash);
        assert_eq!(user.id, original.id);
    }

    #[test]
    fn test_response_excludes_password_hash() {
        let user = sample_user();
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "ana@x.com");
    }

    #[test]
    fn test_profile_flattens_user_fields() {
        let profile = UserProfile {
            user: sample_user().into(),
            addresses: vec![],
        };
        let json = serde_json::to_value(profile).unwrap();

        assert_eq!(json["name"], "Ana");
        assert!(json["addresses"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_update_request_validation() {
        let ok = UpdateUserRequest {
            email: Some("new@x.com".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let short = UpdateUserRequest {
            password: Some("123".to_string()),
            ..Default::default()
        };
        assert!(short.validate().is_err());

        let blank = UpdateUserRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }
}
