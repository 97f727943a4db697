use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::clock;
use crate::domain::models::{User, UserValidationError, UNASSIGNED_ID};
use crate::domain::session::{SessionContext, SessionUser};
use crate::storage::{EntityStore, UserStorage};
use shared::{CreateUserRequest, UpdateUserRequest};

const MAX_NAME_LENGTH: usize = 100;

/// Service for managing the people whose wardrobes are tracked
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStorage>,
    session: SessionContext,
}

impl UserService {
    pub fn new(store: &EntityStore, session: SessionContext) -> Self {
        Self {
            users: store.users.clone(),
            session,
        }
    }

    /// Create a new user
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        info!("Creating user: name={}, birthday={}", request.name, request.birthday);

        validate_name(&request.name)?;
        validate_birthday(request.birthday)?;

        let mut user = User {
            id: UNASSIGNED_ID,
            name: request.name.trim().to_string(),
            gender: request.gender.trim().to_string(),
            birthday: start_of_day(request.birthday),
            created_at: clock::now_local_millis(),
        };
        user.id = self.users.insert_user(&user).await.context("Failed to store user")?;

        info!("Created user: {} with ID: {}", user.name, user.id);
        Ok(user)
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        debug!("Getting user: {}", user_id);
        self.users.get_user(user_id).await
    }

    /// List all users ordered by name
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.users.list_users().await?;
        debug!("Found {} users", users.len());
        Ok(users)
    }

    /// Update an existing user; unset request fields are left unchanged
    pub async fn update_user(&self, user_id: i64, request: UpdateUserRequest) -> Result<User> {
        info!("Updating user: {}", user_id);

        let mut user = self
            .users
            .get_user(user_id)
            .await?
            .ok_or_else(|| anyhow!("User not found: {}", user_id))?;

        if let Some(name) = request.name {
            validate_name(&name)?;
            user.name = name.trim().to_string();
        }
        if let Some(gender) = request.gender {
            user.gender = gender.trim().to_string();
        }
        if let Some(birthday) = request.birthday {
            validate_birthday(birthday)?;
            user.birthday = start_of_day(birthday);
        }

        self.users.update_user(&user).await?;

        info!("Updated user: {} with ID: {}", user.name, user.id);
        Ok(user)
    }

    /// Delete a user together with their clothes and shoes
    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        info!("Deleting user: {}", user_id);

        if !self.users.delete_user(user_id).await? {
            return Err(anyhow!("User not found: {}", user_id));
        }

        info!("Deleted user: {}", user_id);
        Ok(())
    }

    /// Make a user the session user and remember the choice
    pub async fn set_active_user(&self, user_id: i64) -> Result<User> {
        info!("Setting active user: {}", user_id);

        let user = self
            .users
            .get_user(user_id)
            .await?
            .ok_or_else(|| anyhow!("User not found: {}", user_id))?;

        self.users.set_active_user(user.id).await?;
        self.session.assign(SessionUser::from(&user));

        Ok(user)
    }

    /// The session user, if one is set and still exists
    pub async fn active_user(&self) -> Result<Option<User>> {
        let Some(current) = self.session.current() else {
            debug!("No active user set");
            return Ok(None);
        };

        let user = self.users.get_user(current.id).await?;
        if user.is_none() {
            warn!("Active user {} no longer exists", current.id);
        }
        Ok(user)
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn validate_name(name: &str) -> Result<(), UserValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UserValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }
    Ok(())
}

fn validate_birthday(birthday: NaiveDate) -> Result<(), UserValidationError> {
    if birthday > Local::now().date_naive() {
        return Err(UserValidationError::BirthdayInFuture);
    }
    Ok(())
}
