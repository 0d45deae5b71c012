use analysis::{
    histogram, most_recently_updated, repos_per_year, top_languages, top_starred, HistogramBin,
    LanguageCount, SummaryStats, YearCount, MOST_RECENT, PUSH_AGE_BINS, SIZE_BINS, TOP_LANGUAGES,
    TOP_STARRED,
};
use normalizer::{NormalizedRepository, RepoTable};

/// Everything the dashboard draws, computed once from a frozen table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportViews<'a> {
    pub summary: SummaryStats,
    pub per_year: Vec<YearCount>,
    pub languages: Vec<LanguageCount>,
    pub recent: Vec<&'a NormalizedRepository>,
    pub top_starred: Vec<&'a NormalizedRepository>,
    pub size_mb: Vec<HistogramBin>,
    pub push_age_days: Vec<HistogramBin>,
}

impl<'a> ReportViews<'a> {
    pub fn build(table: &'a RepoTable) -> Self {
        let sizes: Vec<f64> = table.iter().map(|repo| repo.size_mb).collect();
        let ages: Vec<f64> = table
            .iter()
            .map(|repo| repo.days_since_last_push as f64)
            .collect();
        Self {
            summary: SummaryStats::from_table(table),
            per_year: repos_per_year(table),
            languages: top_languages(table, TOP_LANGUAGES),
            recent: most_recently_updated(table, MOST_RECENT),
            top_starred: top_starred(table, TOP_STARRED),
            size_mb: histogram(&sizes, SIZE_BINS),
            push_age_days: histogram(&ages, PUSH_AGE_BINS),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.total_repos == 0
    }
}
