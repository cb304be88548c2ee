use serde::{Deserialize, Serialize};

/// One entry of the analysed history, newest first as the log returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    #[serde(rename = "oid")]
    pub id: String,
    pub message: String,
    pub author: String,
    /// RFC 3339 author time
    #[serde(rename = "date")]
    pub timestamp: String,
    pub relative_time: String,
    /// Files touched relative to the previous commit in the analysed range
    #[serde(rename = "filesChanged")]
    pub files_changed_count: usize,
}

impl Commit {
    pub fn short_id(&self) -> &str {
        self.id.get(..7).unwrap_or(&self.id)
    }
}
