use crate::services::{field, ServiceContext};
use crate::transport::HttpTransport;
use crate::types::user::PublicUser;
use crate::{Error, Result};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy)]
pub struct UserService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> UserService<'a> {
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

    /// Public profile of `username`. Unknown users come back as an empty list.
    pub async fn get(&self, username: &str) -> Result<PublicUser> {
        let data = self
            .ctx
            .post("chat/user/public/", json!({ "username": username }))
            .await?;
        match data.get("public_user") {
            Some(Value::Object(_)) => field(data, "public_user"),
            _ => Err(Error::not_found(format!("user {username} not found"))),
        }
    }
}
