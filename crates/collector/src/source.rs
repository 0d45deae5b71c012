use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::GithubClient;

/// Walks `/user/repos` page by page and concatenates the results in order.
///
/// Stops at the first empty page, at a page shorter than `per_page`, or after
/// `max_pages` pages. Errors from the client abort the walk unchanged; there
/// is no retry here.
pub async fn fetch_all_repositories<C>(
    client: &C,
    per_page: u32,
    max_pages: u32,
) -> Result<Vec<Value>>
where
    C: GithubClient + ?Sized,
{
    let per_page = per_page.clamp(1, 100);
    let mut repos = Vec::new();
    let mut page = 1u32;

    loop {
        if page > max_pages {
            warn!(max_pages, fetched = repos.len(), "page limit reached; results may be truncated");
            break;
        }
        let items = client
            .list_user_repos(page, per_page)
            .await
            .with_context(|| format!("fetching repositories page {page}"))?;
        let count = items.len();
        debug!(page, count, "fetched repositories page");
        repos.extend(items);

        if count < per_page as usize {
            break;
        }
        page += 1;
    }

    info!(count = repos.len(), pages = page.min(max_pages), "fetched repositories");
    Ok(repos)
}
