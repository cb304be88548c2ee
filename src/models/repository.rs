use chrono::{DateTime, Utc};
use serde::Serialize;

/// A previously analysed repository, keyed by URL.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    pub id: u64,
    pub url: String,
    pub name: String,
    pub last_analyzed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryListResponse {
    pub repositories: Vec<RepositoryRecord>,
}
