use crate::config::ClientConfig;
use crate::services::{
    AccountService, CharacterService, Chat1Service, Chat2Service, MediaService, PostService,
    RecentService, UserService,
};
use crate::session::{ChatSession, ConnectParams};
use crate::transport::{HttpTransport, WsConnection};
use crate::Result;
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::warn;

/// Character.AI client.
///
/// Holds the resolved configuration and the shared HTTP transport. Cloning is cheap
/// and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<HttpTransport>,
    config: Arc<ClientConfig>,
}

impl Client {
    /// Client for `token` with every other setting taken from the environment or defaults.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::builder().token(token).build()
    }

    pub fn builder() -> crate::client::builder::ClientBuilder {
        crate::client::builder::ClientBuilder::new()
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self {
            transport,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub fn account(&self) -> AccountService<'_> {
        AccountService::new(&self.transport)
    }

    pub fn characters(&self) -> CharacterService<'_> {
        CharacterService::new(&self.transport)
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(&self.transport)
    }

    pub fn posts(&self) -> PostService<'_> {
        PostService::new(&self.transport)
    }

    pub fn recent(&self) -> RecentService<'_> {
        RecentService::new(&self.transport)
    }

    pub fn media(&self) -> MediaService<'_> {
        MediaService::new(&self.transport)
    }

    /// Legacy history-based chat.
    pub fn chat1(&self) -> Chat1Service<'_> {
        Chat1Service::new(&self.transport)
    }

    /// Turn-protocol chat records over HTTP. Use [`Client::connect`] to send messages.
    pub fn chat2(&self) -> Chat2Service<'_> {
        Chat2Service::new(&self.transport)
    }

    /// Open a turn-protocol chat session with the client's token.
    pub async fn connect(&self) -> Result<ChatSession> {
        let token = self.transport.resolve_token(None)?;
        self.open_session(token).await
    }

    /// Open a chat session under another account's token.
    pub async fn connect_as(&self, token: &str) -> Result<ChatSession> {
        let token = self.transport.resolve_token(Some(token))?;
        self.open_session(token).await
    }

    async fn open_session(&self, token: &str) -> Result<ChatSession> {
        let params = ConnectParams {
            url: self.config.ws_url.clone(),
            token: token.to_string(),
            user_agent: self.config.user_agent(),
            connect_timeout: self.config.ws_connect_timeout,
            recv_timeout: self.config.ws_recv_timeout,
        };
        let mut session = ChatSession::<WsConnection>::new(params);
        session.open().await?;
        Ok(session)
    }

    /// Open a session, run `f` on it and close the socket afterwards, whether or not
    /// `f` succeeded.
    ///
    /// ```no_run
    /// # async fn demo(client: characterai::Client) -> characterai::Result<()> {
    /// use characterai::session::SendMessage;
    ///
    /// let turn = client
    ///     .with_session(|session| {
    ///         Box::pin(async move {
    ///             session
    ///                 .send_message(SendMessage::new("char-id", "chat-id", "hello"))
    ///                 .await
    ///         })
    ///     })
    ///     .await?;
    /// println!("{}", turn.text());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_session<T, F>(&self, f: F) -> Result<T>
    where
        F: for<'s> FnOnce(&'s mut ChatSession) -> BoxFuture<'s, Result<T>>,
    {
        let mut session = self.connect().await?;
        let result = f(&mut session).await;
        if let Err(e) = session.close().await {
            warn!(error = %e, "failed to close chat session");
        }
        result
    }
}
