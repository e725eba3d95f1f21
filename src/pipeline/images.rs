//! Stock-photo lookup: best-effort illustration for one section.
//!
//! This stage must never fail the pipeline. Every failure mode — missing
//! credential, HTTP error, empty result set, download failure — is downgraded
//! to `None` with a tracing diagnostic, and the document simply renders that
//! section without a photo.
//!
//! Lookup is two requests: a search (`GET /search/photos?query=...&per_page=1`
//! authenticated with a `Client-ID` header) followed by a plain download of
//! the top hit's `regular`-size URL.

use std::time::Duration;
use tracing::{debug, warn};

#[derive(serde::Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(serde::Deserialize)]
struct SearchResult {
    urls: ImageUrls,
}

#[derive(serde::Deserialize)]
struct ImageUrls {
    regular: String,
}

/// Build the HTTP client shared by all lookups in one run.
///
/// Returns `None` (with a warning) if the client cannot be constructed, which
/// disables photos for the run rather than aborting it.
pub fn lookup_client(timeout_secs: u64) -> Option<reqwest::Client> {
    match reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
    {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("could not build image-lookup client, skipping photos: {e}");
            None
        }
    }
}

/// Search for one photo matching `query` and return its raw bytes.
///
/// Returns `None` when no access key is configured, when any request fails,
/// or when the search comes back empty. Never returns an error.
pub async fn find_image(
    client: &reqwest::Client,
    api_base: &str,
    access_key: Option<&str>,
    query: &str,
) -> Option<Vec<u8>> {
    let Some(key) = access_key else {
        debug!("image access key not configured; skipping photo for '{query}'");
        return None;
    };

    let url = format!("{}/search/photos", api_base.trim_end_matches('/'));
    let response = match client
        .get(&url)
        .query(&[("query", query), ("per_page", "1")])
        .header("Authorization", format!("Client-ID {key}"))
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            warn!("image search failed for '{query}': {e}");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(
            "image search for '{query}' returned HTTP {}",
            response.status()
        );
        return None;
    }

    let reply: SearchResponse = match response.json().await {
        Ok(r) => r,
        Err(e) => {
            warn!("image search reply for '{query}' is not valid JSON: {e}");
            return None;
        }
    };

    let Some(hit) = reply.results.into_iter().next() else {
        debug!("no photo found for '{query}'");
        return None;
    };

    match client.get(&hit.urls.regular).send().await {
        Ok(r) if r.status().is_success() => match r.bytes().await {
            Ok(bytes) => {
                debug!("downloaded {} byte photo for '{query}'", bytes.len());
                Some(bytes.to_vec())
            }
            Err(e) => {
                warn!("photo download for '{query}' broke mid-stream: {e}");
                None
            }
        },
        Ok(r) => {
            warn!("photo download for '{query}' returned HTTP {}", r.status());
            None
        }
        Err(e) => {
            warn!("photo download failed for '{query}': {e}");
            None
        }
    }
}
