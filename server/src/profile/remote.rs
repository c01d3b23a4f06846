//! Remote Image Fetching
//!
//! Validates user-supplied image URLs against fixed protocol and domain
//! allow-lists before any network I/O, then fetches the image with a
//! bounded timeout.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use url::Url;

use super::error::ProfileImageError;

/// Schemes a remote image may be fetched over.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Validate an image URL against the protocol and trusted-domain
/// allow-lists.
///
/// Both checks run before any network access. Hosts are compared
/// case-insensitively by direct membership; anything not listed is
/// rejected.
pub fn validate_image_url(
    raw: &str,
    trusted_domains: &[String],
) -> Result<Url, ProfileImageError> {
    let url = Url::parse(raw)?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(ProfileImageError::InvalidUrlProtocol {
            scheme: url.scheme().to_string(),
        });
    }

    let host = url
        .host_str()
        .ok_or(ProfileImageError::InvalidUrlDomain {
            host: String::new(),
        })?
        .to_lowercase();

    if !trusted_domains.iter().any(|d| d == &host) {
        return Err(ProfileImageError::InvalidUrlDomain { host });
    }

    Ok(url)
}

/// Fetch a validated image URL.
///
/// Fails with `FetchFailed` on transport errors or a non-success status.
/// Body emptiness is detected downstream when the first chunk is sniffed.
pub async fn fetch_image(
    client: &reqwest::Client,
    url: Url,
) -> Result<reqwest::Response, ProfileImageError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(ProfileImageError::FetchFailed(format!(
            "URL returned status {}",
            response.status()
        )));
    }

    Ok(response)
}

/// Pull the first non-empty chunk from a response body stream, returning
/// it together with the rest of the stream.
///
/// An exhausted stream (the URL served an empty body) is a `FetchFailed`.
pub async fn first_chunk<S>(mut body: S) -> Result<(Bytes, S), ProfileImageError>
where
    S: Stream<Item = reqwest::Result<Bytes>> + Unpin,
{
    loop {
        match body.next().await {
            Some(chunk) => {
                let chunk = chunk?;
                if !chunk.is_empty() {
                    return Ok((chunk, body));
                }
            }
            None => {
                return Err(ProfileImageError::FetchFailed(
                    "URL returned an empty body".to_string(),
                ));
            }
        }
    }
}
