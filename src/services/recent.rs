use crate::services::{field, ServiceContext};
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::character::CharacterShort;
use crate::types::recent::{RecentChat, RecentRoom};
use crate::Result;

#[derive(Debug, Clone, Copy)]
pub struct RecentService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> RecentService<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self {
            ctx: ServiceContext::new(transport),
        }
    }

    pub fn with_token(self, token: &'a str) -> Self {
        Self {
            ctx: self.ctx.with_token(token),
        }
    }

    /// Recent turn-protocol chats.
    pub async fn chats(&self) -> Result<Vec<RecentChat>> {
        let data = self.ctx.call(ApiRequest::get("chats/recent/").neo()).await?;
        field(data, "chats")
    }

    /// Characters recently chatted with over the legacy endpoints.
    pub async fn characters(&self) -> Result<Vec<CharacterShort>> {
        field(self.ctx.get("chat/characters/recent/").await?, "characters")
    }

    pub async fn rooms(&self) -> Result<Vec<RecentRoom>> {
        field(self.ctx.get("chat/rooms/recent/").await?, "rooms")
    }
}
