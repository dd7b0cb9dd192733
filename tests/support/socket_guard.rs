//! Mock server start-up for sandboxes that may forbid binding localhost.

use std::net::TcpListener;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "DWL_REQUIRE_SOCKET_TESTS";

/// Starts a mock server, or returns `None` so the caller can skip.
///
/// With `DWL_REQUIRE_SOCKET_TESTS=1` a missing socket is a test failure.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if let Err(e) = TcpListener::bind(("127.0.0.1", 0)) {
        let strict = std::env::var(REQUIRE_ENV).is_ok_and(|value| value == "1");
        assert!(!strict, "{REQUIRE_ENV} is set but localhost is unavailable: {e}");
        eprintln!("skipping: cannot bind localhost ({e})");
        return None;
    }
    Some(MockServer::start().await)
}
