//! Records of analysed repositories.
//!
//! Handlers only see the `RepositoryStore` trait; the in-memory store is the
//! one the server runs with and the one tests use.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::RepositoryRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Lock poisoned")]
    LockPoisoned,

    #[error("Repository {0} not found")]
    NotFound(u64),
}

pub trait RepositoryStore: Send + Sync {
    fn get_by_url(&self, url: &str) -> Result<Option<RepositoryRecord>, StoreError>;

    fn create(&self, url: &str, name: &str) -> Result<RepositoryRecord, StoreError>;

    fn update_last_analyzed(&self, id: u64, at: DateTime<Utc>) -> Result<RepositoryRecord, StoreError>;

    /// All records, oldest first.
    fn list(&self) -> Result<Vec<RepositoryRecord>, StoreError>;

    fn get_or_create(&self, url: &str) -> Result<RepositoryRecord, StoreError> {
        match self.get_by_url(url)? {
            Some(record) => Ok(record),
            None => self.create(url, &repo_name_from_url(url)),
        }
    }
}

#[derive(Default)]
struct Records {
    next_id: u64,
    by_id: BTreeMap<u64, RepositoryRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryStore for MemoryStore {
    fn get_by_url(&self, url: &str) -> Result<Option<RepositoryRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.by_id.values().find(|r| r.url == url).cloned())
    }

    fn create(&self, url: &str, name: &str) -> Result<RepositoryRecord, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        records.next_id += 1;
        let record = RepositoryRecord {
            id: records.next_id,
            url: url.to_string(),
            name: name.to_string(),
            last_analyzed: None,
        };
        records.by_id.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_last_analyzed(&self, id: u64, at: DateTime<Utc>) -> Result<RepositoryRecord, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        let record = records.by_id.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.last_analyzed = Some(at);
        Ok(record.clone())
    }

    fn list(&self) -> Result<Vec<RepositoryRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.by_id.values().cloned().collect())
    }
}

/// `owner/name` from the last two path segments of a repository URL.
pub fn repo_name_from_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let segments: Vec<&str> = trimmed.rsplit('/').take(2).collect();
    segments.into_iter().rev().collect::<Vec<_>>().join("/")
}
