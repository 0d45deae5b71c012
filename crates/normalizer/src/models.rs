use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repositories pushed to within this many days count as active.
pub const ACTIVE_THRESHOLD_DAYS: i64 = 90;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedRepository {
    pub name: String,
    pub is_private: bool,
    pub language: Option<String>,
    pub stargazer_count: u64,
    pub fork_count: u64,
    pub open_issue_count: u64,
    pub size_kb: u64,
    pub size_mb: f64,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub pushed_at: DateTime<Utc>,
    pub year_created: i32,
    pub days_since_last_push: i64,
    pub is_active: bool,
    pub html_url: Option<String>,
}

/// Ordered, read-only set of normalized rows.
///
/// Only the transformer builds one; afterwards it is shared by reference and
/// never mutated, so any number of readers can query it at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepoTable {
    rows: Vec<NormalizedRepository>,
}

impl RepoTable {
    pub(crate) fn from_rows(rows: Vec<NormalizedRepository>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[NormalizedRepository] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedRepository> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a RepoTable {
    type Item = &'a NormalizedRepository;
    type IntoIter = std::slice::Iter<'a, NormalizedRepository>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
