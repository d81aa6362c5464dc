//! In-process store for tests and local demos.
//!
//! Mirrors the PostgreSQL schema: serial ids, unique emails, column widths,
//! the position check constraints, NUL-byte rejection, likes cascading when a
//! location is deleted, and all-or-nothing batches. Each of these surfaces as
//! the same `RepositoryError` variant `PgStore` maps the database error to.

use std::collections::{BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use hotspots_core::{Email, FishId, LocationId, Position, UserId, fits};

use super::{FishStore, LocationStore, RepositoryError, Store, UserCredentials, UserStore};
use crate::models::fish::{LINK_MAX_LEN, NAME_MAX_LEN as FISH_NAME_MAX_LEN};
use crate::models::location::{DIRECTIONS_MAX_LEN, NAME_MAX_LEN as LOCATION_NAME_MAX_LEN};
use crate::models::{Fish, Location, LocationAssociationUpdate, NewFish, NewLocation, NewUser, User};

/// A [`Store`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserCredentials>,
    locations: Vec<Location>,
    fish: Vec<Fish>,
    /// `(user_id, location_id)` pairs.
    likes: BTreeSet<(i32, i32)>,
    next_user_id: i32,
    next_location_id: i32,
    next_fish_id: i32,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_text(column: &str, value: &str, max: usize) -> Result<(), RepositoryError> {
    if value.contains('\0') {
        return Err(RepositoryError::Constraint(format!(
            "{column} contains a NUL byte"
        )));
    }
    if !fits(value, max) {
        return Err(RepositoryError::Constraint(format!(
            "value too long for {column} (max {max})"
        )));
    }
    Ok(())
}

fn check_optional_text(
    column: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), RepositoryError> {
    value.map_or(Ok(()), |v| check_text(column, v, max))
}

fn check_new_location(location: &NewLocation) -> Result<(), RepositoryError> {
    check_text("locations.name", &location.name, LOCATION_NAME_MAX_LEN)?;
    check_optional_text(
        "locations.directions",
        location.directions.as_deref(),
        DIRECTIONS_MAX_LEN,
    )?;
    Position::new(location.position.lat, location.position.lng)
        .map_err(|e| RepositoryError::Constraint(e.to_string()))?;
    Ok(())
}

fn check_new_fish(fish: &NewFish) -> Result<(), RepositoryError> {
    check_text("fish.name", &fish.name, FISH_NAME_MAX_LEN)?;
    check_optional_text("fish.wiki_link", fish.wiki_link.as_deref(), LINK_MAX_LEN)?;
    check_optional_text("fish.image_link", fish.image_link.as_deref(), LINK_MAX_LEN)?;
    Ok(())
}

impl Tables {
    fn check_creator(&self, location: &NewLocation) -> Result<(), RepositoryError> {
        match location.creator_id {
            Some(id) if !self.users.iter().any(|u| u.user.id == id) => Err(
                RepositoryError::Constraint(format!("creator {id} does not exist")),
            ),
            _ => Ok(()),
        }
    }

    fn push_location(&mut self, location: NewLocation) -> Location {
        self.next_location_id += 1;
        let location = location.into_location(LocationId::new(self.next_location_id));
        self.locations.push(location.clone());
        location
    }

    fn push_fish(&mut self, fish: NewFish) -> Fish {
        self.next_fish_id += 1;
        let fish = fish.into_fish(FishId::new(self.next_fish_id));
        self.fish.push(fish.clone());
        fish
    }

    fn liked_by(&self, user: UserId) -> Vec<Location> {
        self.locations
            .iter()
            .filter(|l| self.likes.contains(&(user.as_i32(), l.id.as_i32())))
            .cloned()
            .collect()
    }

    fn added_by(&self, user: UserId) -> Vec<Location> {
        self.locations
            .iter()
            .filter(|l| l.creator_id == Some(user))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        Ok(self.tables().users.iter().any(|u| &u.user.email == email))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.user.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        tables.next_user_id += 1;
        let created = User {
            id: UserId::new(tables.next_user_id),
            email: user.email,
            user_name: user.user_name,
            zipcode: user.zipcode,
        };
        tables.users.push(UserCredentials {
            user: created.clone(),
            password_hash: user.password_hash,
        });

        Ok(created)
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| &u.user.email == email)
            .cloned())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.user.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.tables().users.iter().map(|u| u.user.clone()).collect())
    }

    async fn update_location_associations(
        &self,
        user: UserId,
        updates: &[LocationAssociationUpdate],
    ) -> Result<Vec<Vec<Location>>, RepositoryError> {
        let mut tables = self.tables();
        if !tables.users.iter().any(|u| u.user.id == user) {
            return Err(RepositoryError::NotFound);
        }

        let mut results = Vec::with_capacity(updates.len());
        for update in updates {
            let ids: HashSet<LocationId> = update
                .ids()
                .iter()
                .copied()
                .filter(|id| tables.locations.iter().any(|l| l.id == *id))
                .collect();

            match update {
                LocationAssociationUpdate::Liked(_) => {
                    tables.likes.retain(|(u, _)| *u != user.as_i32());
                    for id in &ids {
                        tables.likes.insert((user.as_i32(), id.as_i32()));
                    }
                    results.push(tables.liked_by(user));
                }
                LocationAssociationUpdate::Added(_) => {
                    for location in &mut tables.locations {
                        if ids.contains(&location.id) {
                            location.creator_id = Some(user);
                        } else if location.creator_id == Some(user) {
                            location.creator_id = None;
                        }
                    }
                    results.push(tables.added_by(user));
                }
            }
        }

        Ok(results)
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn list_locations(&self) -> Result<Vec<Location>, RepositoryError> {
        Ok(self.tables().locations.clone())
    }

    async fn create_location(&self, location: NewLocation) -> Result<Location, RepositoryError> {
        check_new_location(&location)?;
        let mut tables = self.tables();
        tables.check_creator(&location)?;
        Ok(tables.push_location(location))
    }

    async fn location_name_exists(&self, name: &str) -> Result<bool, RepositoryError> {
        check_text("locations.name", name, usize::MAX)?;
        Ok(self.tables().locations.iter().any(|l| l.name == name))
    }

    async fn insert_locations(&self, batch: &[NewLocation]) -> Result<u64, RepositoryError> {
        let mut tables = self.tables();
        for location in batch {
            check_new_location(location)?;
            tables.check_creator(location)?;
        }
        for location in batch {
            tables.push_location(location.clone());
        }
        Ok(batch.len() as u64)
    }

    async fn clear_locations(&self) -> Result<u64, RepositoryError> {
        let mut tables = self.tables();
        let removed = tables.locations.len() as u64;
        tables.locations.clear();
        tables.likes.clear();
        Ok(removed)
    }
}

#[async_trait]
impl FishStore for MemoryStore {
    async fn list_fish(&self) -> Result<Vec<Fish>, RepositoryError> {
        Ok(self.tables().fish.clone())
    }

    async fn create_fish(&self, fish: NewFish) -> Result<Fish, RepositoryError> {
        check_new_fish(&fish)?;
        Ok(self.tables().push_fish(fish))
    }

    async fn fish_name_exists(&self, name: &str) -> Result<bool, RepositoryError> {
        check_text("fish.name", name, usize::MAX)?;
        Ok(self.tables().fish.iter().any(|f| f.name == name))
    }

    async fn insert_fish(&self, batch: &[NewFish]) -> Result<u64, RepositoryError> {
        for fish in batch {
            check_new_fish(fish)?;
        }
        let mut tables = self.tables();
        for fish in batch {
            tables.push_fish(fish.clone());
        }
        Ok(batch.len() as u64)
    }

    async fn clear_fish(&self) -> Result<u64, RepositoryError> {
        let mut tables = self.tables();
        let removed = tables.fish.len() as u64;
        tables.fish.clear();
        Ok(removed)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hotspots_core::LocationKind;

    use super::*;

    fn lake(name: &str) -> NewLocation {
        NewLocation {
            name: name.to_owned(),
            kind: LocationKind::Fishing,
            position: Position::new(40.0, -75.0).unwrap(),
            directions: None,
            creator_id: None,
        }
    }

    fn fish(name: &str) -> NewFish {
        NewFish {
            name: name.to_owned(),
            wiki_link: None,
            image_link: None,
        }
    }

    async fn angler(store: &MemoryStore, email: &str) -> User {
        store
            .create_user(NewUser {
                email: Email::parse(email).unwrap(),
                password_hash: "hash".to_owned(),
                user_name: "angler".to_owned(),
                zipcode: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        angler(&store, "a@b.com").await;

        let err = store
            .create_user(NewUser {
                email: Email::parse("a@b.com").unwrap(),
                password_hash: "hash".to_owned(),
                user_name: "again".to_owned(),
                zipcode: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let store = MemoryStore::new();
        let batch = vec![fish("Pike"), fish("Bad\0Name"), fish("Perch")];

        let err = store.insert_fish(&batch).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint(_)));
        assert!(store.list_fish().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_overlong_name() {
        let store = MemoryStore::new();
        let err = store.create_fish(fish(&"x".repeat(101))).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint(_)));
        store.create_fish(fish(&"x".repeat(100))).await.unwrap();
    }

    #[tokio::test]
    async fn test_liked_ignores_unknown_ids() {
        let store = MemoryStore::new();
        let user = angler(&store, "a@b.com").await;
        let first = store.create_location(lake("One")).await.unwrap();
        let second = store.create_location(lake("Two")).await.unwrap();

        let results = store
            .update_location_associations(
                user.id,
                &[LocationAssociationUpdate::Liked(vec![
                    second.id,
                    LocationId::new(999),
                    first.id,
                ])],
            )
            .await
            .unwrap();

        let ids: Vec<_> = results[0].iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_added_detaches_omitted_locations() {
        let store = MemoryStore::new();
        let user = angler(&store, "a@b.com").await;
        let mut owned = lake("Owned");
        owned.creator_id = Some(user.id);
        let owned = store.create_location(owned).await.unwrap();
        let other = store.create_location(lake("Other")).await.unwrap();

        let results = store
            .update_location_associations(
                user.id,
                &[LocationAssociationUpdate::Added(vec![other.id])],
            )
            .await
            .unwrap();

        assert_eq!(results[0].len(), 1);
        assert_eq!(results[0][0].id, other.id);
        let all = store.list_locations().await.unwrap();
        assert_eq!(all.iter().find(|l| l.id == owned.id).unwrap().creator_id, None);
    }

    #[tokio::test]
    async fn test_unknown_user_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_location_associations(UserId::new(1), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_clear_reports_removed_rows() {
        let store = MemoryStore::new();
        store.create_location(lake("One")).await.unwrap();
        store.create_location(lake("Two")).await.unwrap();

        assert_eq!(store.clear_locations().await.unwrap(), 2);
        assert!(!store.location_name_exists("One").await.unwrap());
    }
}
