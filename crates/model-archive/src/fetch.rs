// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Remote artifact download.
//!
//! Remote archives are streamed into a [`tempfile::NamedTempFile`] that lives
//! only as long as the caller keeps it; the unpacked contents are what the
//! loader holds on to.

use crate::ArchiveError;
use std::io::Write;
use std::time::Duration;

/// Connect timeout for artifact downloads. Transfers themselves are unbounded
/// since model archives routinely run into hundreds of megabytes.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns `true` if `location` names a remote artifact.
pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Downloads `url` into a temporary file and returns it.
pub fn download(url: &str) -> Result<tempfile::NamedTempFile, ArchiveError> {
    let fetch_error = |detail: String| ArchiveError::Fetch {
        url: url.to_string(),
        detail,
    };

    tracing::info!("downloading artifact from {url}");

    let client = reqwest::blocking::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(None)
        .build()
        .map_err(|e| fetch_error(format!("cannot build HTTP client: {e}")))?;

    let mut response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| fetch_error(e.to_string()))?;

    let mut file = tempfile::Builder::new()
        .prefix("artifact-")
        .suffix(&archive_suffix(url))
        .tempfile()?;

    let bytes = response
        .copy_to(file.as_file_mut())
        .map_err(|e| fetch_error(format!("transfer interrupted: {e}")))?;
    file.as_file_mut().flush()?;

    tracing::info!(
        "downloaded {:.2} MB to {}",
        bytes as f64 / (1024.0 * 1024.0),
        file.path().display(),
    );
    Ok(file)
}

/// Keeps the archive extension of the URL path so the loader can recognise
/// the downloaded file.
fn archive_suffix(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path.ends_with(".tgz") {
        ".tgz".into()
    } else {
        ".tar.gz".into()
    }
}
