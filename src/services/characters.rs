use crate::services::account::merge;
use crate::services::{field, query, ServiceContext};
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::character::{
    Categories, Character, CharacterShort, CharacterUpdate, NewCharacter, SearchResult, Voice,
};
use crate::{Error, Result};
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct CharacterService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> CharacterService<'a> {
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

    pub async fn get(&self, character_id: &str) -> Result<Character> {
        field(self.info(character_id).await?, "character")
    }

    async fn info(&self, character_id: &str) -> Result<Value> {
        self.ctx
            .post("chat/character/info/", json!({ "external_id": character_id }))
            .await
    }

    pub async fn upvoted(&self) -> Result<Vec<CharacterShort>> {
        field(self.ctx.get("chat/user/characters/upvoted/").await?, "characters")
    }

    pub async fn categories(&self) -> Result<Categories> {
        field(
            self.ctx.get("chat/curated_categories/characters/").await?,
            "characters_by_curated_category",
        )
    }

    /// One curated category by display name, e.g. `"Helpers"`.
    pub async fn category(&self, name: &str) -> Result<Vec<CharacterShort>> {
        self.categories()
            .await?
            .remove(name)
            .ok_or_else(|| Error::not_found(format!("category {name} not found")))
    }

    pub async fn trending(&self) -> Result<Vec<CharacterShort>> {
        field(self.ctx.get("chat/characters/trending/").await?, "trending_characters")
    }

    /// Personal recommendations (neo host).
    pub async fn recommended(&self) -> Result<Vec<CharacterShort>> {
        let data = self
            .ctx
            .call(ApiRequest::get("recommendation/v1/user").neo())
            .await?;
        field(data, "characters")
    }

    pub async fn search(&self, text: &str) -> Result<Vec<SearchResult>> {
        field(
            self.ctx
                .get(format!("chat/characters/search/?query={}", query(text)))
                .await?,
            "characters",
        )
    }

    pub async fn create(&self, character: &NewCharacter) -> Result<Character> {
        let mut body = serde_json::to_value(character)?;
        if character.identifier.is_empty() {
            body["identifier"] = Value::String(format!("id:{}", uuid::Uuid::new_v4()));
        }

        let created: Character = field(self.ctx.post("chat/character/create/", body).await?, "character")?;
        info!(character_id = created.external_id.as_str(), "character created");
        Ok(created)
    }

    /// Apply `update` on top of the character's current settings.
    pub async fn update(&self, character_id: &str, update: &CharacterUpdate) -> Result<Character> {
        let current = self.info(character_id).await?;
        let info = &current["character"];
        if !info.is_object() {
            return Err(Error::not_found(format!("character {character_id} not found")));
        }

        let mut body = json!({
            "external_id": character_id,
            "name": info["name"],
            "greeting": info["greeting"],
            "title": info["title"],
            "visibility": info["visibility"],
            "copyable": info["copyable"],
            "description": info["description"],
            "definition": info["definition"],
            "default_voice_id": info["default_voice_id"],
            "voice_id": info["voice_id"],
            "strip_img_prompt_from_msg": info["strip_img_prompt_from_msg"],
            "base_img_prompt": info["base_img_prompt"],
            "img_gen_enabled": info["img_gen_enabled"],
            "avatar_rel_path": info["avatar_file_name"],
            "categories": [],
            "archived": Value::Null,
        });
        merge(&mut body, serde_json::to_value(update)?);

        field(self.ctx.post("chat/character/update/", body).await?, "character")
    }

    pub async fn voices(&self) -> Result<Vec<Voice>> {
        field(self.ctx.get("chat/character/voices/").await?, "voices")
    }
}
