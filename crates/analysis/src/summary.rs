use std::collections::HashSet;

use normalizer::RepoTable;
use serde::Serialize;

/// Headline figures for the dashboard's KPI cards.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SummaryStats {
    pub total_repos: usize,
    pub active_repos: usize,
    pub inactive_repos: usize,
    pub total_stars: u64,
    pub total_forks: u64,
    pub distinct_languages: usize,
    pub private_repos: usize,
    pub public_repos: usize,
    pub archived_repos: usize,
}

impl SummaryStats {
    pub fn from_table(table: &RepoTable) -> Self {
        let mut stats = SummaryStats {
            total_repos: table.len(),
            ..Default::default()
        };
        let mut languages = HashSet::new();
        for repo in table {
            if repo.is_active {
                stats.active_repos += 1;
            }
            if repo.is_private {
                stats.private_repos += 1;
            }
            if repo.is_archived {
                stats.archived_repos += 1;
            }
            stats.total_stars = stats.total_stars.saturating_add(repo.stargazer_count);
            stats.total_forks = stats.total_forks.saturating_add(repo.fork_count);
            if let Some(language) = repo.language.as_deref() {
                languages.insert(language);
            }
        }
        stats.distinct_languages = languages.len();
        stats.inactive_repos = stats.total_repos - stats.active_repos;
        stats.public_repos = stats.total_repos - stats.private_repos;
        stats
    }
}
