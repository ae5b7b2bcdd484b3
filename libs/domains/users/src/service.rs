use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, NewUser, UpdateUser, UserResponse};
use crate::repository::UserRepository;

/// Service layer for user business rules.
///
/// Stateless between calls; every operation is a fresh round trip to the
/// repository, at most one of which mutates state.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new user. Fails with `DuplicateEmail` when the address is
    /// already taken.
    ///
    /// The existence check and the insert are two separate storage calls, so
    /// concurrent creates with the same email can race past the check. The
    /// Postgres store backstops this with a unique constraint on email; the
    /// in-memory store accepts the window.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        if self.repository.exists_by_email(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let created = self.repository.insert(NewUser::from(input)).await?;
        Ok(created.into())
    }

    /// Every user, in storage order.
    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Get a user by id.
    pub async fn get_user(&self, id: i64) -> UserResult<UserResponse> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    /// Replace a user's mutable fields wholesale.
    ///
    /// Email uniqueness is only checked at create time: an update may claim
    /// another record's address. Under Postgres the unique constraint still
    /// rejects that as a conflict; the in-memory store accepts it.
    pub async fn update_user(&self, id: i64, input: UpdateUser) -> UserResult<UserResponse> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        user.apply_update(input);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Delete a user permanently.
    pub async fn delete_user(&self, id: i64) -> UserResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(UserError::NotFound(id));
        }

        self.repository.delete_by_id(id).await?;
        Ok(())
    }
}
