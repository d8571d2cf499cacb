//! Fetching or reading the source document.

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::LoadError;
use crate::parse::{self, spec::RawDocument};

/// Whether `location` should be fetched over the network.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Load and parse the document at `location`, a `http(s)://` URL or a file path.
pub fn load(location: &str, timeout: Duration) -> Result<RawDocument, LoadError> {
    let content = if is_remote(location) {
        fetch(location, timeout)?
    } else {
        let path = Path::new(location);
        fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?
    };
    log::info!("loaded {} ({} bytes)", location, content.len());
    Ok(parse::from_str(&content)?)
}

fn fetch(url: &str, timeout: Duration) -> Result<String, LoadError> {
    let http_error = |source: reqwest::Error| {
        if source.is_timeout() {
            LoadError::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else {
            LoadError::Http {
                url: url.to_string(),
                source,
            }
        }
    };

    log::debug!("fetching {url} (timeout {}s)", timeout.as_secs());
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(http_error)?;
    let response = client.get(url).send().map_err(http_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().map_err(http_error)
}
