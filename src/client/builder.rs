use crate::client::core::Client;
use crate::config::ClientConfig;
use crate::Result;
use std::time::Duration;

/// Builder for [`Client`].
///
/// Starts from [`ClientConfig::from_env`], so anything not set here falls back to the
/// `CAI_*` environment variables and then to the production defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::from_env(),
        }
    }

    /// Start from an explicit configuration, ignoring the environment.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Override the REST host (primarily for testing with mock servers).
    pub fn rest_url(mut self, url: impl Into<String>) -> Self {
        self.config.rest_url = url.into();
        self
    }

    pub fn neo_url(mut self, url: impl Into<String>) -> Self {
        self.config.neo_url = url.into();
        self
    }

    pub fn ws_url(mut self, url: impl Into<String>) -> Self {
        self.config.ws_url = url.into();
        self
    }

    /// Base URL of the image CDN used by [`crate::services::MediaService::download`].
    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.config.image_url = url.into();
        self
    }

    /// Browser identifier, e.g. `chrome120` or `firefox117`.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.config.identifier = identifier.into();
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn ws_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.ws_connect_timeout = timeout;
        self
    }

    /// Per-frame receive timeout on chat sessions; `None` waits indefinitely.
    pub fn ws_recv_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.ws_recv_timeout = timeout;
        self
    }

    /// Proxy for HTTP requests only; chat sessions connect to `ws_url` directly.
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.config.proxy = Some(url.into());
        self
    }

    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
