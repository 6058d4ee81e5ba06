use crate::models::{NewMatch, Profile, ProfileId};
use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised by profile and match stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the profile population
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// All profiles, in a stable order
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;

    async fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>, StoreError>;

    /// Profiles whose name equals `name`, ignoring case
    async fn find_by_name(&self, name: &str) -> Result<Vec<Profile>, StoreError>;
}

/// Write access for match records
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Persist a batch of matches, all or nothing. Returns the number written.
    async fn insert_matches(&self, matches: &[NewMatch]) -> Result<u64, StoreError>;
}

/// In-process store used for tests and local dry runs
#[derive(Debug, Default)]
pub struct InMemoryStore {
    profiles: Vec<Profile>,
    matches: Mutex<Vec<NewMatch>>,
    reject_writes: bool,
}

impl InMemoryStore {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles,
            ..Default::default()
        }
    }

    /// A store whose batch writes always fail
    pub fn rejecting_writes(profiles: Vec<Profile>) -> Self {
        Self {
            profiles,
            reject_writes: true,
            ..Default::default()
        }
    }

    /// Matches written so far
    pub fn matches(&self) -> Vec<NewMatch> {
        self.matches
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.profiles.clone())
    }

    async fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Profile>, StoreError> {
        let needle = name.to_lowercase();
        Ok(self
            .profiles
            .iter()
            .filter(|p| p.name.to_lowercase() == needle)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn insert_matches(&self, matches: &[NewMatch]) -> Result<u64, StoreError> {
        if self.reject_writes {
            return Err(StoreError::Unavailable("writes rejected".into()));
        }

        let mut stored = self
            .matches
            .lock()
            .map_err(|_| StoreError::Unavailable("match store lock poisoned".into()))?;
        stored.extend_from_slice(matches);

        Ok(matches.len() as u64)
    }
}
