//! Location persistence.

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use hotspots_core::{LocationId, LocationKind, Position, UserId};

use super::{PgStore, RepositoryError};
use crate::models::{Location, NewLocation};

/// Column list matching [`LocationRow`].
pub(super) const LOCATION_COLUMNS: &str =
    "id, name, kind, latitude, longitude, directions, creator_id";

/// Location operations.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// All locations, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_locations(&self) -> Result<Vec<Location>, RepositoryError>;

    /// Insert one location.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the store rejects a value.
    async fn create_location(&self, location: NewLocation) -> Result<Location, RepositoryError>;

    /// Whether a location with exactly this name exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn location_name_exists(&self, name: &str) -> Result<bool, RepositoryError>;

    /// Insert a batch of locations atomically: either all rows are written or none.
    ///
    /// # Errors
    ///
    /// Returns the first error the store reports; nothing is written.
    async fn insert_locations(&self, batch: &[NewLocation]) -> Result<u64, RepositoryError>;

    /// Delete every location. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    async fn clear_locations(&self) -> Result<u64, RepositoryError>;
}

#[derive(sqlx::FromRow)]
pub(super) struct LocationRow {
    id: i32,
    name: String,
    kind: LocationKind,
    latitude: f64,
    longitude: f64,
    directions: Option<String>,
    creator_id: Option<i32>,
}

impl TryFrom<LocationRow> for Location {
    type Error = RepositoryError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        let position = Position::new(row.latitude, row.longitude).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid position in database: {e}"))
        })?;

        Ok(Self {
            id: LocationId::new(row.id),
            name: row.name,
            kind: row.kind,
            position,
            directions: row.directions,
            creator_id: row.creator_id.map(UserId::new),
        })
    }
}

#[async_trait]
impl LocationStore for PgStore {
    async fn list_locations(&self) -> Result<Vec<Location>, RepositoryError> {
        let rows: Vec<LocationRow> =
            sqlx::query_as(&format!("SELECT {LOCATION_COLUMNS} FROM locations ORDER BY id"))
                .fetch_all(self.pool())
                .await?;

        rows.into_iter().map(Location::try_from).collect()
    }

    async fn create_location(&self, location: NewLocation) -> Result<Location, RepositoryError> {
        let row: LocationRow = sqlx::query_as(&format!(
            r"
            INSERT INTO locations (name, kind, latitude, longitude, directions, creator_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {LOCATION_COLUMNS}
            "
        ))
        .bind(&location.name)
        .bind(location.kind)
        .bind(location.position.lat)
        .bind(location.position.lng)
        .bind(&location.directions)
        .bind(location.creator_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "location already exists"))?;

        row.try_into()
    }

    async fn location_name_exists(&self, name: &str) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM locations WHERE name = $1)")
                .bind(name)
                .fetch_one(self.pool())
                .await
                .map_err(|e| RepositoryError::from_sqlx(e, "location already exists"))?;

        Ok(exists)
    }

    async fn insert_locations(&self, batch: &[NewLocation]) -> Result<u64, RepositoryError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO locations (name, kind, latitude, longitude, directions, creator_id) ",
        );
        builder.push_values(batch, |mut row, location| {
            row.push_bind(location.name.clone())
                .push_bind(location.kind)
                .push_bind(location.position.lat)
                .push_bind(location.position.lng)
                .push_bind(location.directions.clone())
                .push_bind(location.creator_id);
        });

        let mut tx = self.pool().begin().await?;
        let result = builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "location already exists"))?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn clear_locations(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM locations")
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }
}
