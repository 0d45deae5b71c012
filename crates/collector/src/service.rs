use std::sync::Arc;

use analysis::SummaryStats;
use anyhow::Result;
use chrono::{DateTime, Utc};
use common::config::GithubConfig;
use normalizer::{transform_values, SkippedRecord};
use report::{ReportOutcome, ReportWriter};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::client::GithubClient;
use crate::source::fetch_all_repositories;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    pub fetched: usize,
    pub skipped: Vec<SkippedRecord>,
    pub summary: SummaryStats,
    pub outcome: ReportOutcome,
}

impl PipelineSummary {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Fetch, normalize and write the report in a single pass.
pub struct ReportPipeline<C: GithubClient + 'static> {
    config: GithubConfig,
    client: Arc<C>,
    writer: ReportWriter,
}

impl<C: GithubClient + 'static> ReportPipeline<C> {
    pub fn new(config: GithubConfig, client: Arc<C>, writer: ReportWriter) -> Self {
        Self {
            config,
            client,
            writer,
        }
    }

    pub async fn run(&self) -> Result<PipelineSummary> {
        self.run_at(Utc::now()).await
    }

    /// Runs the pipeline with `now` as the reference instant for every row.
    #[instrument(skip(self), fields(run_id = %Uuid::new_v4()))]
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<PipelineSummary> {
        let raw = fetch_all_repositories(
            self.client.as_ref(),
            self.config.per_page,
            self.config.max_pages,
        )
        .await?;
        let fetched = raw.len();

        let outcome = transform_values(raw, now);
        for skipped in &outcome.skipped {
            warn!(
                index = skipped.index,
                name = ?skipped.name,
                reason = %skipped.reason,
                "malformed repository record skipped"
            );
        }

        let summary = SummaryStats::from_table(&outcome.table);
        info!(
            total = summary.total_repos,
            active = summary.active_repos,
            stars = summary.total_stars,
            languages = summary.distinct_languages,
            private = summary.private_repos,
            skipped = outcome.skipped_count(),
            "repository summary"
        );

        let written = self.writer.write(&outcome.table)?;
        Ok(PipelineSummary {
            fetched,
            skipped: outcome.skipped,
            summary,
            outcome: written,
        })
    }
}
