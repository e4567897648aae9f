use crate::error::Result;
use tracing::{debug, info};

/// Fetches the source page and returns the response body as text.
///
/// One attempt, no retry, default timeouts: the source is a fixed archive
/// snapshot, so a failed fetch means the run cannot proceed. Non-success
/// statuses are treated as failures too; an error page carries no table.
pub fn fetch_page(url: &str) -> Result<String> {
    debug!("Fetching source page from {}", url);
    let client = reqwest::blocking::Client::new();
    let body = client.get(url).send()?.error_for_status()?.text()?;
    info!("Fetched {} bytes from source page", body.len());
    Ok(body)
}
