//! User persistence: accounts and their location associations.

use async_trait::async_trait;

use hotspots_core::{Email, UserId};

use super::locations::{LOCATION_COLUMNS, LocationRow};
use super::{PgStore, RepositoryError};
use crate::models::{Location, LocationAssociationUpdate, NewUser, User};

/// A user together with their stored password hash.
///
/// Only returned to the login flow; never serialized.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// User operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether an account with this email exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError>;

    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Look up a user and their password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, RepositoryError>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// All users, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    /// Replace the given associations of a user, all in one transaction.
    ///
    /// Location ids that do not exist are ignored. Returns the resulting
    /// locations of each update, in the order the updates were given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    async fn update_location_associations(
        &self,
        user: UserId,
        updates: &[LocationAssociationUpdate],
    ) -> Result<Vec<Vec<Location>>, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    user_name: String,
    zipcode: Option<i32>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            user_name: row.user_name,
            zipcode: row.zipcode,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password: String,
}

#[async_trait]
impl UserStore for PgStore {
    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(self.pool())
                .await?;

        Ok(exists)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            r"
            INSERT INTO users (email, password, user_name, zipcode)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, user_name, zipcode
            ",
        )
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.user_name)
        .bind(user.zipcode)
        .fetch_one(self.pool())
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "email already exists"))?;

        row.try_into()
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let row: Option<CredentialsRow> = sqlx::query_as(
            "SELECT id, email, user_name, zipcode, password FROM users WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.map(|r| {
            Ok(UserCredentials {
                user: r.user.try_into()?,
                password_hash: r.password,
            })
        })
        .transpose()
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, email, user_name, zipcode FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool())
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> =
            sqlx::query_as("SELECT id, email, user_name, zipcode FROM users ORDER BY id")
                .fetch_all(self.pool())
                .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_location_associations(
        &self,
        user: UserId,
        updates: &[LocationAssociationUpdate],
    ) -> Result<Vec<Vec<Location>>, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let found: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
            .bind(user)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let mut results = Vec::with_capacity(updates.len());
        for update in updates {
            let ids: Vec<i32> = update.ids().iter().map(|id| id.as_i32()).collect();

            let rows: Vec<LocationRow> = match update {
                LocationAssociationUpdate::Liked(_) => {
                    sqlx::query("DELETE FROM likes WHERE user_id = $1")
                        .bind(user)
                        .execute(&mut *tx)
                        .await?;
                    sqlx::query(
                        r"
                        INSERT INTO likes (user_id, location_id)
                        SELECT $1, id FROM locations WHERE id = ANY($2)
                        ",
                    )
                    .bind(user)
                    .bind(&ids)
                    .execute(&mut *tx)
                    .await?;

                    sqlx::query_as(&format!(
                        r"
                        SELECT {LOCATION_COLUMNS} FROM locations
                        WHERE id IN (SELECT location_id FROM likes WHERE user_id = $1)
                        ORDER BY id
                        "
                    ))
                    .bind(user)
                    .fetch_all(&mut *tx)
                    .await?
                }
                LocationAssociationUpdate::Added(_) => {
                    sqlx::query(
                        "UPDATE locations SET creator_id = NULL WHERE creator_id = $1 AND NOT (id = ANY($2))",
                    )
                    .bind(user)
                    .bind(&ids)
                    .execute(&mut *tx)
                    .await?;
                    sqlx::query("UPDATE locations SET creator_id = $1 WHERE id = ANY($2)")
                        .bind(user)
                        .bind(&ids)
                        .execute(&mut *tx)
                        .await?;

                    sqlx::query_as(&format!(
                        "SELECT {LOCATION_COLUMNS} FROM locations WHERE creator_id = $1 ORDER BY id"
                    ))
                    .bind(user)
                    .fetch_all(&mut *tx)
                    .await?
                }
            };

            results.push(
                rows.into_iter()
                    .map(Location::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            );
        }

        tx.commit().await?;
        Ok(results)
    }
}
