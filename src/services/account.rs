use crate::services::{decode, field, query, ServiceContext};
use crate::transport::HttpTransport;
use crate::types::account::{AccountUpdate, Me, Persona, PersonaShort};
use crate::types::character::CharacterShort;
use crate::{Error, Result};
use serde_json::{json, Value};
use tracing::info;

/// The account behind the token: profile, personas, social graph.
#[derive(Debug, Clone, Copy)]
pub struct AccountService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> AccountService<'a> {
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

    pub async fn me(&self) -> Result<Me> {
        decode(self.ctx.get("chat/user/").await?, "account")
    }

    /// Update profile fields; anything not set in `update` is resent unchanged.
    pub async fn edit(&self, update: &AccountUpdate) -> Result<()> {
        let current = self.ctx.get("chat/user/").await?;
        let profile = &current["user"];
        let account = &profile["user"]["account"];

        let mut body = json!({
            "username": profile["user"]["username"],
            "name": profile["name"],
            "avatar_type": account["avatar_type"],
            "avatar_rel_path": account["avatar_file_name"],
            "bio": profile["bio"],
        });
        merge(&mut body, serde_json::to_value(update)?);

        self.ctx.post("chat/user/update/", body).await?;
        info!(endpoint = "chat/user/update/", "account updated");
        Ok(())
    }

    pub async fn personas(&self) -> Result<Vec<PersonaShort>> {
        field(self.ctx.get("chat/personas/?force_refresh=1").await?, "personas")
    }

    /// Create a persona. `custom_id` becomes its identifier; a random `id:<uuid>` otherwise.
    pub async fn create_persona(
        &self,
        title: &str,
        definition: &str,
        custom_id: Option<&str>,
    ) -> Result<Persona> {
        if title.trim().is_empty() {
            return Err(Error::invalid_argument("persona title must not be empty"));
        }
        let identifier = custom_id
            .map(str::to_string)
            .unwrap_or_else(|| format!("id:{}", uuid::Uuid::new_v4()));

        let body = json!({
            "title": title,
            "name": title,
            "identifier": identifier,
            "categories": [],
            "visibility": "PUBLIC",
            "copyable": false,
            "description": "This is my persona.",
            "greeting": "Hello! This is my persona",
            "definition": definition,
            "avatar_rel_path": "",
            "img_gen_enabled": false,
            "base_img_prompt": "",
            "avatar_file_name": "",
            "voice_id": "",
            "strip_img_prompt_from_msg": false,
        });
        field(self.ctx.post("chat/persona/create/", body).await?, "persona")
    }

    pub async fn persona(&self, persona_id: &str) -> Result<Persona> {
        field(
            self.ctx
                .get(format!("chat/persona/?id={}", query(persona_id)))
                .await?,
            "persona",
        )
    }

    /// Personas cannot be deleted outright; they are archived.
    pub async fn delete_persona(&self, persona_id: &str) -> Result<Persona> {
        let current = self
            .ctx
            .get(format!("chat/persona/?id={}", query(persona_id)))
            .await?;
        let mut body = match current.get("persona") {
            Some(Value::Object(p)) => Value::Object(p.clone()),
            _ => {
                return Err(Error::not_found(format!("persona {persona_id} not found")));
            }
        };
        body["archived"] = Value::Bool(true);

        field(self.ctx.post("chat/persona/update/", body).await?, "persona")
    }

    pub async fn followers(&self) -> Result<Vec<Value>> {
        field(self.ctx.get("chat/user/followers/").await?, "followers")
    }

    pub async fn following(&self) -> Result<Vec<Value>> {
        field(self.ctx.get("chat/user/following/").await?, "following")
    }

    /// Characters created by this account.
    pub async fn characters(&self) -> Result<Vec<CharacterShort>> {
        field(self.ctx.get("chat/characters/?scope=user").await?, "characters")
    }
}

/// Overlay the keys of `patch` onto `base`.
pub(crate) fn merge(base: &mut Value, patch: Value) {
    if let (Some(base), Value::Object(patch)) = (base.as_object_mut(), patch) {
        for (k, v) in patch {
            base.insert(k, v);
        }
    }
}
