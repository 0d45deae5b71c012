pub mod dashboard;
pub mod errors;
pub mod export;
pub mod views;
pub mod writer;

pub use dashboard::render_dashboard;
pub use errors::ExportError;
pub use export::{parse_csv, read_csv, to_csv_string, write_csv, COLUMNS};
pub use views::ReportViews;
pub use writer::{ReportOutcome, ReportWriter};
