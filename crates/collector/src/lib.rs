pub mod client;
pub mod service;
pub mod source;

pub use client::{GithubApiError, GithubClient, RestGithubClient};
pub use service::{PipelineSummary, ReportPipeline};
pub use source::fetch_all_repositories;
