//! Blocking facade over the async client.
//!
//! [`Client`] owns a single-threaded tokio runtime and drives the async API to
//! completion on the calling thread. It must not be used from inside an async
//! runtime: `block_on` panics when called from a runtime worker thread.
//!
//! ```no_run
//! let client = characterai::blocking::Client::new("TOKEN")?;
//! let me = client.call(|c| async move { c.account().me().await })?;
//! println!("{:?}", me.username());
//! # Ok::<(), characterai::Error>(())
//! ```

use crate::session::{NewChatOptions, NextMessage, SendMessage, SessionState};
use crate::types::{Character, ChatData, Me, SearchResult, Turn};
use crate::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::warn;

/// Blocking client. See the [module docs](self).
#[derive(Debug, Clone)]
pub struct Client {
    inner: crate::Client,
    rt: Arc<Runtime>,
}

impl Client {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::from_async(crate::Client::new(token)?)
    }

    /// Wrap an already configured async client.
    pub fn from_async(inner: crate::Client) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            inner,
            rt: Arc::new(rt),
        })
    }

    pub fn inner(&self) -> &crate::Client {
        &self.inner
    }

    /// Run any async operation against a clone of the inner client.
    pub fn call<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(crate::Client) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.rt.block_on(f(self.inner.clone()))
    }

    pub fn me(&self) -> Result<Me> {
        self.rt.block_on(self.inner.account().me())
    }

    pub fn character(&self, character_id: &str) -> Result<Character> {
        self.rt.block_on(self.inner.characters().get(character_id))
    }

    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.rt.block_on(self.inner.characters().search(query))
    }

    /// Open a turn-protocol chat session.
    pub fn connect(&self) -> Result<ChatSession> {
        let session = self.rt.block_on(self.inner.connect())?;
        Ok(ChatSession {
            inner: session,
            rt: Arc::clone(&self.rt),
        })
    }
}

/// Blocking turn-protocol session. Call [`ChatSession::close`] when done.
#[derive(Debug)]
pub struct ChatSession {
    inner: crate::session::ChatSession,
    rt: Arc<Runtime>,
}

impl ChatSession {
    pub fn state(&self) -> SessionState {
        self.inner.state()
    }

    pub fn new_chat(
        &mut self,
        character_id: &str,
        creator_id: &str,
        options: NewChatOptions,
    ) -> Result<(ChatData, Option<Turn>)> {
        self.rt
            .block_on(self.inner.new_chat(character_id, creator_id, options))
    }

    pub fn send_message(&mut self, message: SendMessage) -> Result<Turn> {
        self.rt.block_on(self.inner.send_message(message))
    }

    pub fn next_message(
        &mut self,
        character_id: &str,
        chat_id: &str,
        turn_id: &str,
        options: NextMessage,
    ) -> Result<Turn> {
        self.rt
            .block_on(self.inner.next_message(character_id, chat_id, turn_id, options))
    }

    pub fn edit_message(&mut self, chat_id: &str, turn_id: &str, text: &str) -> Result<Turn> {
        self.rt
            .block_on(self.inner.edit_message(chat_id, turn_id, text))
    }

    pub fn delete_messages<S: AsRef<str>>(&mut self, chat_id: &str, turn_ids: &[S]) -> Result<()> {
        self.rt
            .block_on(self.inner.delete_messages(chat_id, turn_ids))
    }

    pub fn close(&mut self) -> Result<()> {
        let closed = self.rt.block_on(self.inner.close());
        if let Err(e) = &closed {
            warn!(error = %e, "failed to close chat session");
        }
        closed
    }
}
