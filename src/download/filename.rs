//! Local file name derivation for downloaded links.

use std::borrow::Cow;

use url::Url;

/// Name used when the URL path does not end in a file segment.
pub const INDEX_FILE_NAME: &str = "index.html";

/// Derives the local file name for a parsed URL.
///
/// The path is percent-decoded first and the name is whatever follows the
/// last `/`. An empty path, a bare `/`, or any path ending in `/` maps to
/// [`INDEX_FILE_NAME`]. Query and fragment are ignored.
///
/// # Example
///
/// ```
/// use dwl_core::download::file_name_for_url;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/one/two/file.zip?x=1").unwrap();
/// assert_eq!(file_name_for_url(&url), "file.zip");
/// ```
#[must_use]
pub fn file_name_for_url(url: &Url) -> String {
    let path = decode_path(url.path());
    if path.is_empty() || path.ends_with('/') {
        return INDEX_FILE_NAME.to_string();
    }

    path.rsplit('/')
        .next()
        .map_or_else(|| INDEX_FILE_NAME.to_string(), ToString::to_string)
}

fn decode_path(path: &str) -> Cow<'_, str> {
    match urlencoding::decode(path) {
        Ok(decoded) => decoded,
        // Not valid UTF-8 once decoded; keep what we can.
        Err(_) => {
            let bytes = urlencoding::decode_binary(path.as_bytes());
            Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}
