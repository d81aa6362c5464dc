//! Test account generator.

use tracing::{info, instrument};

use hotspots_core::Email;

use super::{SeedError, SeedReport};
use crate::db::{RepositoryError, UserStore};
use crate::models::NewUser;
use crate::services::auth::hash_password;

/// Password given to every generated test user.
pub const TEST_USER_PASSWORD: &str = "123456";

/// Create `test_user1@test.com` through `test_user{count}@test.com`.
///
/// Emails that already exist are skipped.
///
/// # Errors
///
/// Returns `SeedError::Repository` if the store fails and `SeedError::Auth`
/// if a password cannot be hashed.
#[instrument(skip(store))]
pub async fn insert_test_users<S: UserStore + ?Sized>(
    store: &S,
    count: u32,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    for n in 1..=count {
        let user_name = format!("test_user{n}");
        let email = Email::parse(&format!("{user_name}@test.com"))
            .map_err(crate::services::AuthError::from)?;

        if store.email_exists(&email).await? {
            report.skipped_existing += 1;
            continue;
        }

        let created = store
            .create_user(NewUser {
                email,
                password_hash: hash_password(TEST_USER_PASSWORD)?,
                user_name,
                zipcode: None,
            })
            .await;

        match created {
            Ok(user) => {
                info!(email = %user.email, "test user created");
                report.created += 1;
            }
            Err(RepositoryError::Conflict(_)) => report.skipped_existing += 1,
            Err(e) => return Err(e.into()),
        }
    }

    info!(%report, "test users done");
    Ok(report)
}
