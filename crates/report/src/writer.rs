use std::fs;
use std::path::{Path, PathBuf};

use common::config::ReportConfig;
use common::{AppError, Result};
use normalizer::RepoTable;
use tracing::{info, instrument, warn};

use crate::dashboard::render_dashboard;
use crate::export::write_csv;
use crate::views::ReportViews;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The table was empty; nothing was written.
    NothingToReport,
    Written {
        csv_path: PathBuf,
        dashboard_path: PathBuf,
        rows: usize,
    },
}

pub struct ReportWriter {
    config: ReportConfig,
}

impl ReportWriter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    #[instrument(skip(self, table), fields(rows = table.len()))]
    pub fn write(&self, table: &RepoTable) -> Result<ReportOutcome> {
        if table.is_empty() {
            warn!("no repositories to report; skipping csv and dashboard");
            return Ok(ReportOutcome::NothingToReport);
        }

        let dir = self.output_dir();
        fs::create_dir_all(dir)?;
        let csv_path = dir.join(&self.config.csv_file);
        let dashboard_path = dir.join(&self.config.dashboard_file);

        write_csv(table, &csv_path).map_err(AppError::export)?;
        info!(path = %csv_path.display(), "csv export written");

        let views = ReportViews::build(table);
        let svg = render_dashboard(&views, &self.config.title);
        fs::write(&dashboard_path, svg)?;
        info!(path = %dashboard_path.display(), "dashboard saved");

        Ok(ReportOutcome::Written {
            csv_path,
            dashboard_path,
            rows: table.len(),
        })
    }
}
