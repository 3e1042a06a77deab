//! Reads a raw JSON document from a URL or a local file.

use event_map_ingest_models::DataLocation;

use crate::IngestError;

/// Fetches and parses the JSON document at `location`.
///
/// # Errors
///
/// Returns [`IngestError`] if the request fails, the server answers with a
/// non-success status, the file cannot be read, or the body is not JSON.
pub async fn fetch_json(
    client: &reqwest::Client,
    location: &DataLocation,
) -> Result<serde_json::Value, IngestError> {
    let body = match location {
        DataLocation::Url { url } => {
            log::debug!("Fetching {url}");
            let resp = client.get(url).send().await?;
            if !resp.status().is_success() {
                return Err(IngestError::Status {
                    url: url.clone(),
                    status: resp.status().as_u16(),
                });
            }
            resp.text().await?
        }
        DataLocation::File { path } => {
            log::debug!("Reading {}", path.display());
            tokio::fs::read_to_string(path).await?
        }
    };

    Ok(serde_json::from_str(&body)?)
}
