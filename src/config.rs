//! Client configuration.
//!
//! Every knob has a production default and an environment override, so a bare
//! `Client::new(token)` works out of the box while tests can point all hosts at
//! local mock servers.

use std::env;
use std::time::Duration;

pub const DEFAULT_REST_URL: &str = "https://plus.character.ai/";
pub const DEFAULT_NEO_URL: &str = "https://neo.character.ai/";
pub const DEFAULT_WS_URL: &str = "wss://neo.character.ai/ws/";
pub const DEFAULT_IMAGE_URL: &str = "https://characterai.io/i/";
pub const DEFAULT_IDENTIFIER: &str = "chrome120";

/// Resolved configuration shared by the HTTP transport and chat sessions.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: Option<String>,
    pub rest_url: String,
    pub neo_url: String,
    pub ws_url: String,
    pub image_url: String,
    /// Browser identifier; selects the User-Agent sent on every request.
    pub identifier: String,
    pub http_timeout: Duration,
    pub ws_connect_timeout: Duration,
    /// Per-frame receive timeout on the chat socket. `None` waits forever.
    pub ws_recv_timeout: Option<Duration>,
    /// HTTP(S) proxy for REST, neo and CDN requests. The chat socket always connects
    /// directly.
    pub proxy: Option<String>,
}

impl ClientConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let ws_recv_secs = env_u64("CAI_WS_RECV_TIMEOUT_SECS").unwrap_or(120);

        Self {
            token: env::var("CAI_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            rest_url: env::var("CAI_REST_URL").unwrap_or_else(|_| DEFAULT_REST_URL.to_string()),
            neo_url: env::var("CAI_NEO_URL").unwrap_or_else(|_| DEFAULT_NEO_URL.to_string()),
            ws_url: env::var("CAI_WS_URL").unwrap_or_else(|_| DEFAULT_WS_URL.to_string()),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            identifier: env::var("CAI_IDENTIFIER")
                .unwrap_or_else(|_| DEFAULT_IDENTIFIER.to_string()),
            http_timeout: Duration::from_secs(env_u64("CAI_HTTP_TIMEOUT_SECS").unwrap_or(30)),
            ws_connect_timeout: Duration::from_secs(
                env_u64("CAI_WS_CONNECT_TIMEOUT_SECS").unwrap_or(15),
            ),
            ws_recv_timeout: (ws_recv_secs > 0).then(|| Duration::from_secs(ws_recv_secs)),
            proxy: env::var("CAI_PROXY_URL").ok(),
        }
    }

    pub fn user_agent(&self) -> String {
        user_agent_for(&self.identifier)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|s| s.trim().parse::<u64>().ok())
}

/// Map a browser identifier such as `chrome120` or `firefox117` to a User-Agent.
/// Unknown identifiers are sent verbatim.
pub fn user_agent_for(identifier: &str) -> String {
    let split = identifier
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(identifier.len());
    let (browser, version) = identifier.split_at(split);

    match (browser, version) {
        ("chrome", v) if !v.is_empty() => format!(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/{v}.0.0.0 Safari/537.36"
        ),
        ("edge", v) if !v.is_empty() => format!(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/{v}.0.0.0 Safari/537.36 Edg/{v}.0.0.0"
        ),
        ("firefox", v) if !v.is_empty() => format!(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:{v}.0) Gecko/20100101 Firefox/{v}.0"
        ),
        _ => identifier.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrome_identifier_maps_to_versioned_agent() {
        let ua = user_agent_for("chrome120");
        assert!(ua.contains("Chrome/120.0.0.0"));
    }

    #[test]
    fn unknown_identifier_is_verbatim() {
        assert_eq!(user_agent_for("my-bot/1.0"), "my-bot/1.0");
    }
}
