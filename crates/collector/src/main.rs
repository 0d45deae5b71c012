use std::sync::Arc;

use anyhow::Result;
use collector::{ReportPipeline, RestGithubClient};
use common::{config::AppConfig, logging};
use report::{ReportOutcome, ReportWriter};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    logging::init_logging(&config.logging.level);
    let token = config.github.resolved_token()?;

    let client = Arc::new(RestGithubClient::new(
        token,
        &config.github.user_agent,
        &config.github.api_base,
    )?);
    let writer = ReportWriter::new(config.report.clone());
    let pipeline = ReportPipeline::new(config.github.clone(), client, writer);

    let summary = pipeline.run().await?;
    match &summary.outcome {
        ReportOutcome::NothingToReport => {
            warn!(
                fetched = summary.fetched,
                skipped = summary.skipped_count(),
                "nothing to report"
            );
        }
        ReportOutcome::Written {
            csv_path,
            dashboard_path,
            rows,
        } => {
            info!(
                rows,
                skipped = summary.skipped_count(),
                csv = %csv_path.display(),
                dashboard = %dashboard_path.display(),
                "report generated"
            );
        }
    }
    Ok(())
}
