//! Default User-Agent string for download requests.

/// Project URL sent in the User-Agent.
const PROJECT_UA_URL: &str = "https://github.com/lex-r/dwl";

/// Default User-Agent for download requests, e.g. `dwl/0.1.0 (+https://github.com/lex-r/dwl)`.
#[must_use]
pub fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("dwl/{version} (+{PROJECT_UA_URL})")
}
