//! Fish species persistence.

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use hotspots_core::FishId;

use super::{PgStore, RepositoryError};
use crate::models::{Fish, NewFish};

/// Fish species operations.
#[async_trait]
pub trait FishStore: Send + Sync {
    /// All fish, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_fish(&self) -> Result<Vec<Fish>, RepositoryError>;

    /// Insert one fish species.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the store rejects a value.
    async fn create_fish(&self, fish: NewFish) -> Result<Fish, RepositoryError>;

    /// Whether a fish with exactly this name exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn fish_name_exists(&self, name: &str) -> Result<bool, RepositoryError>;

    /// Insert a batch of fish atomically: either all rows are written or none.
    ///
    /// # Errors
    ///
    /// Returns the first error the store reports; nothing is written.
    async fn insert_fish(&self, batch: &[NewFish]) -> Result<u64, RepositoryError>;

    /// Delete every fish. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    async fn clear_fish(&self) -> Result<u64, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct FishRow {
    id: i32,
    name: String,
    wiki_link: Option<String>,
    image_link: Option<String>,
}

impl From<FishRow> for Fish {
    fn from(row: FishRow) -> Self {
        Self {
            id: FishId::new(row.id),
            name: row.name,
            wiki_link: row.wiki_link,
            image_link: row.image_link,
        }
    }
}

#[async_trait]
impl FishStore for PgStore {
    async fn list_fish(&self) -> Result<Vec<Fish>, RepositoryError> {
        let rows: Vec<FishRow> =
            sqlx::query_as("SELECT id, name, wiki_link, image_link FROM fish ORDER BY id")
                .fetch_all(self.pool())
                .await?;

        Ok(rows.into_iter().map(Fish::from).collect())
    }

    async fn create_fish(&self, fish: NewFish) -> Result<Fish, RepositoryError> {
        let row: FishRow = sqlx::query_as(
            r"
            INSERT INTO fish (name, wiki_link, image_link)
            VALUES ($1, $2, $3)
            RETURNING id, name, wiki_link, image_link
            ",
        )
        .bind(&fish.name)
        .bind(&fish.wiki_link)
        .bind(&fish.image_link)
        .fetch_one(self.pool())
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "fish already exists"))?;

        Ok(row.into())
    }

    async fn fish_name_exists(&self, name: &str) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM fish WHERE name = $1)")
            .bind(name)
            .fetch_one(self.pool())
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "fish already exists"))?;

        Ok(exists)
    }

    async fn insert_fish(&self, batch: &[NewFish]) -> Result<u64, RepositoryError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("INSERT INTO fish (name, wiki_link, image_link) ");
        builder.push_values(batch, |mut row, fish| {
            row.push_bind(fish.name.clone())
                .push_bind(fish.wiki_link.clone())
                .push_bind(fish.image_link.clone());
        });

        let mut tx = self.pool().begin().await?;
        let result = builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "fish already exists"))?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn clear_fish(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM fish").execute(self.pool()).await?;

        Ok(result.rows_affected())
    }
}
