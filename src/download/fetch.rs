//! The fetch unit: one link, one request, at most one save.

use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::{Method, Request, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::Url;

use super::HttpClient;
use super::config::EngineConfig;
use super::error::DownloadError;
use super::filename::file_name_for_url;
use crate::saver::Saver;

/// Outcome of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// The link that was downloaded.
    pub link: String,
    /// Name the body was stored under.
    pub name: String,
    /// Number of body bytes stored.
    pub bytes: u64,
}

/// Downloads `link` and hands the body to `saver`.
///
/// The whole operation (request, response and save) runs under a deadline of
/// `config.timeout` and is abandoned as soon as `cancel` fires. A token that
/// is already cancelled short-circuits before any network I/O.
///
/// # Errors
///
/// - [`DownloadError::Cancelled`] if `cancel` fired first
/// - [`DownloadError::Timeout`] if the deadline expired
/// - [`DownloadError::InvalidUrl`] / [`DownloadError::InvalidHeader`] if the
///   request could not be built
/// - [`DownloadError::Network`] if the transport failed
/// - [`DownloadError::HttpStatus`] for any status other than `200 OK`
/// - [`DownloadError::Save`] if the sink failed
#[instrument(skip(client, saver, config, cancel), fields(link = %link))]
pub async fn fetch_link(
    client: &dyn HttpClient,
    saver: &dyn Saver,
    link: &str,
    config: &EngineConfig,
    cancel: &CancellationToken,
) -> Result<SavedFile, DownloadError> {
    if cancel.is_cancelled() {
        return Err(DownloadError::cancelled(link));
    }

    let work = fetch_and_save(client, saver, link, &config.user_agent);
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(DownloadError::cancelled(link)),
        result = tokio::time::timeout(config.timeout, work) => {
            result.unwrap_or_else(|_| Err(DownloadError::timeout(link)))
        }
    }
}

async fn fetch_and_save(
    client: &dyn HttpClient,
    saver: &dyn Saver,
    link: &str,
    user_agent: &str,
) -> Result<SavedFile, DownloadError> {
    let request = build_request(link, user_agent)?;
    let url = request.url().clone();

    debug!("sending request");
    let mut response = client.execute(request).await?;
    if response.status != StatusCode::OK {
        return Err(DownloadError::http_status(link, response.status.as_u16()));
    }

    let name = file_name_for_url(&url);
    debug!(name = %name, "saving response body");
    let bytes = saver
        .save(&name, &mut response.body)
        .await
        .map_err(|e| DownloadError::save(link, e))?;

    Ok(SavedFile {
        link: link.to_string(),
        name,
        bytes,
    })
}

/// Builds the `GET` request for `link` with the given User-Agent.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] if the link does not parse or is not
/// http(s), and [`DownloadError::InvalidHeader`] if `user_agent` contains
/// characters not allowed in a header value.
pub fn build_request(link: &str, user_agent: &str) -> Result<Request, DownloadError> {
    let url = Url::parse(link).map_err(|e| DownloadError::invalid_url(link, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DownloadError::invalid_url(
            link,
            format!("unsupported scheme {:?}", url.scheme()),
        ));
    }
    let user_agent =
        HeaderValue::from_str(user_agent).map_err(|_| DownloadError::invalid_header(link))?;

    let mut request = Request::new(Method::GET, url);
    request.headers_mut().insert(USER_AGENT, user_agent);
    Ok(request)
}
