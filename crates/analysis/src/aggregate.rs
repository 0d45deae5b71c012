use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use normalizer::{NormalizedRepository, RepoTable};
use serde::Serialize;

pub const TOP_LANGUAGES: usize = 8;
pub const MOST_RECENT: usize = 5;
pub const TOP_STARRED: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LanguageCount {
    pub language: String,
    pub count: usize,
}

/// Numeric column a ranking can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Stars,
    Forks,
    OpenIssues,
    SizeKb,
    DaysSinceLastPush,
}

impl Metric {
    pub fn value(self, repo: &NormalizedRepository) -> i64 {
        match self {
            Metric::Stars => saturating_i64(repo.stargazer_count),
            Metric::Forks => saturating_i64(repo.fork_count),
            Metric::OpenIssues => saturating_i64(repo.open_issue_count),
            Metric::SizeKb => saturating_i64(repo.size_kb),
            Metric::DaysSinceLastPush => repo.days_since_last_push,
        }
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Row count per creation year, ascending. Years without rows are not filled in.
pub fn repos_per_year(table: &RepoTable) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for repo in table {
        *counts.entry(repo.year_created).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// The `k` most common languages, most common first.
///
/// Rows without a language are left out of the grouping. Equal counts are
/// ordered alphabetically so the result does not depend on hash order.
pub fn top_languages(table: &RepoTable, k: usize) -> Vec<LanguageCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for language in table.iter().filter_map(|repo| repo.language.as_deref()) {
        *counts.entry(language).or_default() += 1;
    }
    let mut ranked: Vec<LanguageCount> = counts
        .into_iter()
        .map(|(language, count)| LanguageCount {
            language: language.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(language_order);
    ranked.truncate(k);
    ranked
}

/// The `k` rows pushed to most recently, freshest first; ties keep table order.
pub fn most_recently_updated(table: &RepoTable, k: usize) -> Vec<&NormalizedRepository> {
    top_by_metric(table, Metric::DaysSinceLastPush, k, SortOrder::Ascending)
}

/// The first `k` rows ranked by `metric`. The sort is stable, so rows with
/// equal values keep their table order.
pub fn top_by_metric(
    table: &RepoTable,
    metric: Metric,
    k: usize,
    order: SortOrder,
) -> Vec<&NormalizedRepository> {
    let mut ranked: Vec<&NormalizedRepository> = table.iter().collect();
    ranked.sort_by(|a, b| {
        let ordering = metric.value(a).cmp(&metric.value(b));
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    ranked.truncate(k);
    ranked
}

pub fn top_starred(table: &RepoTable, k: usize) -> Vec<&NormalizedRepository> {
    top_by_metric(table, Metric::Stars, k, SortOrder::Descending)
}

/// Orders language names the same way [`top_languages`] breaks ties.
pub fn language_order(a: &LanguageCount, b: &LanguageCount) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.language.cmp(&b.language))
}
