//! Authentication: registration, login, and password changes.
//!
//! Passwords are hashed with Argon2id. Sessions are the only credential the
//! browser holds; nothing here issues tokens.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tracing::instrument;

use bella_store_core::{Email, UserId, UserRole};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

mod error;

pub use error::AuthError;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Fields submitted when registering.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Register a new customer account.
///
/// # Errors
///
/// Returns [`AuthError::InvalidEmail`], [`AuthError::WeakPassword`], or
/// [`AuthError::UserAlreadyExists`] for invalid input; repository errors
/// otherwise.
#[instrument(skip_all)]
pub async fn register(pool: &PgPool, registration: &Registration) -> Result<User, AuthError> {
    let email = Email::parse(&registration.email)?;
    validate_password(&registration.password)?;

    let password_hash = hash_password(&registration.password)?;

    let user = UserRepository::new(pool)
        .create(
            &email,
            &password_hash,
            registration.first_name.trim(),
            registration.last_name.trim(),
            registration.phone.as_deref(),
            UserRole::Customer,
        )
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

    Ok(user)
}

/// Verify credentials and return the user.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] for an unknown email or wrong
/// password (indistinguishable on purpose), [`AuthError::AccountDisabled`]
/// for deactivated accounts.
#[instrument(skip_all)]
pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<User, AuthError> {
    let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

    let Some((user, password_hash)) = UserRepository::new(pool)
        .get_with_password_hash(&email)
        .await?
    else {
        return Err(AuthError::InvalidCredentials);
    };

    verify_password(password, &password_hash)?;

    if !user.is_active {
        return Err(AuthError::AccountDisabled);
    }

    Ok(user)
}

/// Change a user's password after verifying the current one.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] if the current password is
/// wrong, [`AuthError::WeakPassword`] if the new one fails validation.
pub async fn change_password(
    pool: &PgPool,
    user_id: UserId,
    current_password: &str,
    new_password: &str,
) -> Result<(), AuthError> {
    validate_password(new_password)?;

    let repo = UserRepository::new(pool);
    let user = repo.get_by_id(user_id).await?.ok_or(AuthError::UserNotFound)?;

    let email = Email::parse(&user.email).map_err(|_| AuthError::UserNotFound)?;
    let Some((_, password_hash)) = repo.get_with_password_hash(&email).await? else {
        return Err(AuthError::UserNotFound);
    };

    verify_password(current_password, &password_hash)?;

    let new_hash = hash_password(new_password)?;
    repo.set_password_hash(user_id, &new_hash).await?;

    Ok(())
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_length_enforced() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = hash_password("correct horse").expect("hash");
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
