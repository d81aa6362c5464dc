//! Authentication service.
//!
//! Provides email + password signup and login. Tokens are issued by the
//! caller through [`TokenService`](crate::services::TokenService) once a flow
//! here succeeds.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{info, instrument};

use hotspots_core::Email;

use crate::db::{RepositoryError, Store};
use crate::models::{NewUser, User};

/// Input to [`AuthService::signup`].
#[derive(Debug, Clone)]
pub struct Signup<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub user_name: &'a str,
    pub zipcode: Option<i32>,
}

/// Authentication service.
pub struct AuthService<'a> {
    store: &'a dyn Store,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip_all, fields(email = %signup.email))]
    pub async fn signup(&self, signup: Signup<'_>) -> Result<User, AuthError> {
        let email = Email::parse(signup.email)?;

        if self.store.email_exists(&email).await? {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(signup.password)?;

        let user = self
            .store
            .create_user(NewUser {
                email,
                password_hash,
                user_name: signup.user_name.to_owned(),
                zipcode: signup.zipcode,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account has this email.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let credentials = self
            .store
            .find_credentials(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &credentials.password_hash)?;

        Ok(credentials.user)
    }
}

/// Hash a password with Argon2id and a random salt, returning the PHC string.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Check a password against a stored PHC string.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match or
/// the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn signup<'a>(email: &'a str, password: &'a str) -> Signup<'a> {
        Signup {
            email,
            password,
            user_name: "angler",
            zipcode: None,
        }
    }

    #[test]
    fn test_hash_is_salted_and_verifies() {
        let first = hash_password("123456").unwrap();
        let second = hash_password("123456").unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        verify_password("123456", &first).unwrap();
        assert!(matches!(
            verify_password("654321", &first),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("123456", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        let user = auth.signup(signup("a@b.com", "secret")).await.unwrap();
        let logged_in = auth.login("a@b.com", "secret").await.unwrap();

        assert_eq!(user, logged_in);
    }

    #[tokio::test]
    async fn test_duplicate_signup_rejected() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        auth.signup(signup("a@b.com", "secret")).await.unwrap();
        let err = auth.signup(signup("a@b.com", "other")).await.unwrap_err();

        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_login_distinguishes_unknown_email() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.signup(signup("a@b.com", "secret")).await.unwrap();

        assert!(matches!(
            auth.login("c@d.com", "secret").await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            auth.login("a@b.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
