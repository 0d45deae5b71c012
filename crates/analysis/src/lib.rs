pub mod aggregate;
pub mod histogram;
pub mod summary;

pub use aggregate::{
    most_recently_updated, repos_per_year, top_by_metric, top_languages, top_starred,
    LanguageCount, Metric, SortOrder, YearCount, MOST_RECENT, TOP_LANGUAGES, TOP_STARRED,
};
pub use histogram::{histogram, HistogramBin, PUSH_AGE_BINS, SIZE_BINS};
pub use summary::SummaryStats;
