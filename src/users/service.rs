use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::addresses::Address;
use crate::auth::password::PasswordService;
use crate::store::{Criteria, Entity, SortOrder, Store, StoreError};
use crate::users::{
    normalize_email, UpdateUserRequest, User, UserError, UserPatch, UserProfile, UserResponse,
};

/// Service layer for user profile business logic
#[derive(Clone)]
pub struct UserService {
    users: Store<User>,
    addresses: Store<Address>,
    passwords: PasswordService,
}

impl UserService {
    /// Create a new UserService
    pub fn new(users: Store<User>, addresses: Store<Address>, passwords: PasswordService) -> Self {
        Self {
            users,
            addresses,
            passwords,
        }
    }

    /// The user with `id` and every address they own
    pub async fn me(&self, id: Uuid) -> Result<UserProfile, UserError> {
        let user = self.find(id).await?;
        let addresses = self.owned_addresses(id).await?;

        Ok(UserProfile {
            user: user.into(),
            addresses,
        })
    }

    /// Update profile fields
    ///
    /// This method:
    /// 1. Fetches the existing user
    /// 2. Re-checks email uniqueness when the email changes
    /// 3. Re-hashes the password only when a new one is supplied
    /// 4. Merges the supplied fields into the stored row
    ///
    /// Outstanding session tokens stay valid after a password change.
    pub async fn update(&self, id: Uuid, request: UpdateUserRequest) -> Result<UserResponse, UserError> {
        // 1. Fetch existing user
        let existing = self.find(id).await?;

        // 2. Email uniqueness
        let email = match request.email {
            Some(email) => {
                let email = normalize_email(&email);
                if email != existing.email {
                    self.check_email_available(&email).await?;
                }
                Some(email)
            }
            None => None,
        };

        // 3. Password
        let password_hash = match request.password {
            Some(password) => Some(self.passwords.hash(&password).await?),
            None => None,
        };

        // 4. Persist
        let patch = UserPatch {
            name: request.name,
            email,
            password_hash,
        };
        let updated = self.users.update(id, patch).await.map_err(|e| match e {
            StoreError::NotFound { .. } => UserError::NotFound,
            StoreError::Conflict(_) => UserError::EmailTaken,
            other => UserError::Store(other),
        })?;

        tracing::info!("Updated user {}", id);
        Ok(updated.into())
    }

    /// Delete the user and every address they own as one transaction
    ///
    /// Any failure before commit drops the transaction, which rolls back,
    /// so either all rows go or none do.
    pub async fn destroy(&self, id: Uuid) -> Result<(), UserError> {
        let mut tx = self.users.begin().await?;
        let removed = self.delete_cascade_with(&mut tx, id).await?;
        tx.commit().await.map_err(StoreError::from)?;

        tracing::info!("Deleted user {} with {} addresses", id, removed);
        Ok(())
    }

    /// The cascade steps of `destroy`, without the commit
    ///
    /// The user row is locked first so no address can be added for it
    /// between listing and deleting. Returns the number of addresses removed.
    pub(crate) async fn delete_cascade_with(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        id: Uuid,
    ) -> Result<usize, UserError> {
        self.users
            .find_for_update_with(&mut **tx, id)
            .await?
            .ok_or(UserError::NotFound)?;

        let owned = self
            .addresses
            .list_with(&mut **tx, &Criteria::new().eq("user_id", id))
            .await?;
        if !owned.is_empty() {
            let ids: Vec<Uuid> = owned.iter().map(Entity::id).collect();
            self.addresses.delete_many_with(&mut **tx, &ids).await?;
        }

        self.users.destroy_with(&mut **tx, id).await.map_err(|e| match e {
            StoreError::NotFound { .. } => UserError::NotFound,
            other => UserError::Store(other),
        })?;

        Ok(owned.len())
    }

    async fn find(&self, id: Uuid) -> Result<User, UserError> {
        self.users.find_by_id(id).await?.ok_or(UserError::NotFound)
    }

    async fn owned_addresses(&self, id: Uuid) -> Result<Vec<Address>, UserError> {
        let criteria = Criteria::new()
            .eq("user_id", id)
            .order_by("created_at", SortOrder::Desc);
        Ok(self.addresses.list(&criteria).await?)
    }

    async fn check_email_available(&self, email: &str) -> Result<(), UserError> {
        if self.users.exists(&Criteria::new().eq("email", email)).await? {
            tracing::warn!("Email already registered");
            return Err(UserError::EmailTaken);
        }
        Ok(())
    }
}
