//! Page fetching and anchor-link extraction.

pub mod fetch;
pub mod links;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::info;

use linkmill_core::LinkRecord;

pub use fetch::Fetcher;
pub use links::extract_links;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// Fetch each URL and collect its anchor links as records with sequential
/// ids starting at `next_id`. Ids continue across pages so rows can be
/// appended to an existing TSV without renumbering.
pub async fn collect_links(
    fetcher: &Fetcher,
    urls: &[String],
    mut next_id: u64,
    now: NaiveDateTime,
) -> Result<Vec<LinkRecord>, IngestError> {
    let mut records = Vec::new();
    for url in urls {
        let body = fetcher.get(url).await?;
        let links = extract_links(&body);
        info!(url = %url, links = links.len(), "collected anchors");
        for link in links {
            records.push(LinkRecord {
                id: next_id,
                url: link,
                created_at: now,
            });
            next_id += 1;
        }
    }
    Ok(records)
}
