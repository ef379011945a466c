//! Accounts: user registration and lookup. No login or sessions: callers pass a `user_id`.

pub mod handlers;

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub is_employer: bool,
}

pub async fn register_user(pool: &PgPool, request: RegisterRequest) -> Result<User, AppError> {
    validate_registration(&request)?;
    let password_hash = hash_password(&request.password)?;

    let result = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, password_hash, email, is_employer)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.username.trim())
    .bind(&password_hash)
    .bind(request.email.trim())
    .bind(request.is_employer)
    .fetch_one(pool)
    .await;

    match result {
        Ok(user) => {
            info!("Registered {} account '{}'", user.role(), user.username);
            Ok(user)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
            "Username already exists. Please choose another username.".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn get_user(pool: &PgPool, user_id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

pub async fn get_user_by_username(pool: &PgPool, username: &str) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username.trim())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{username}' not found")))
}

/// Loads a user and checks they hold the employer role.
pub async fn require_employer(pool: &PgPool, user_id: Uuid) -> Result<User, AppError> {
    let user = get_user(pool, user_id).await?;
    if !user.is_employer {
        return Err(AppError::Forbidden(
            "Only employer accounts can do this".to_string(),
        ));
    }
    Ok(user)
}

/// Loads a user and checks they hold the candidate role.
pub async fn require_candidate(pool: &PgPool, user_id: Uuid) -> Result<User, AppError> {
    let user = get_user(pool, user_id).await?;
    if user.is_employer {
        return Err(AppError::Forbidden(
            "Employer accounts cannot apply to jobs".to_string(),
        ));
    }
    Ok(user)
}

fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
    if request.username.trim().is_empty()
        || request.password.is_empty()
        || request.email.trim().is_empty()
    {
        return Err(AppError::Validation("All fields are required.".to_string()));
    }
    let email = request.email.trim();
    if !email.contains('@') || !email.contains('.') {
        return Err(AppError::Validation(
            "Please enter a valid email address.".to_string(),
        ));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Salt generation failed: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    fn request(username: &str, password: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            is_employer: false,
        }
    }

    #[test]
    fn test_registration_requires_all_fields() {
        let err = validate_registration(&request("  ", "secret", "a@b.io")).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("required")));
        assert!(validate_registration(&request("jane", "", "a@b.io")).is_err());
        assert!(validate_registration(&request("jane", "secret", "")).is_err());
    }

    #[test]
    fn test_registration_rejects_email_without_at_or_dot() {
        let err = validate_registration(&request("jane", "secret", "jane.doe")).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("email")));
        assert!(validate_registration(&request("jane", "secret", "jane@localhost")).is_err());
    }

    #[test]
    fn test_registration_accepts_valid_request() {
        assert!(validate_registration(&request("jane", "secret", "jane@example.com")).is_ok());
    }

    #[test]
    fn test_password_hash_verifies_and_is_salted() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);

        let parsed = PasswordHash::new(&first).unwrap();
        assert!(Argon2::default()
            .verify_password(b"hunter2", &parsed)
            .is_ok());
        assert!(Argon2::default()
            .verify_password(b"hunter3", &parsed)
            .is_err());
    }
}
