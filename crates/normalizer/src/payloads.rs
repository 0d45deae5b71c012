use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};

/// One entry of `GET /user/repos`, decoded leniently.
///
/// Every field may be missing or `null` in the payload. Defaults for counters
/// and flags are applied here; required fields (`name`, `created_at`,
/// `pushed_at`) stay optional so the transformer can report them as malformed
/// instead of failing the whole decode.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRepository {
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, rename = "private")]
    pub is_private: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub forks_count: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default, rename = "size")]
    pub size_kb: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl RawRepository {
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
