use crate::types::media::HasAvatar;
use crate::types::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
struct RawAccount {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    avatar_type: Option<String>,
    #[serde(default)]
    onboarding_complete: Option<bool>,
    #[serde(default)]
    avatar_file_name: Option<String>,
    #[serde(default)]
    mobile_onboarding_complete: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawUser {
    #[serde(default)]
    username: String,
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    account: Option<RawAccount>,
    #[serde(default)]
    is_staff: bool,
    #[serde(default)]
    subscription: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawUserInfo {
    #[serde(default)]
    user: RawUser,
    #[serde(default)]
    is_human: Option<bool>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    needs_to_acknowledge_policy: Option<bool>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    suspended_until: Option<DateTime<Utc>>,
    #[serde(default)]
    hidden_characters: Vec<Value>,
    #[serde(default)]
    blocked_users: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawMe {
    #[serde(default)]
    user: RawUserInfo,
}

/// A temporary guest account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Guest {
    pub username: String,
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A registered account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub username: String,
    pub id: Option<i64>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub avatar_type: Option<String>,
    pub avatar_file_name: Option<String>,
    pub onboarding_complete: Option<bool>,
    pub mobile_onboarding_complete: Option<i64>,
    pub bio: Option<String>,
    pub is_staff: bool,
    pub is_human: bool,
    pub email: Option<String>,
    pub subscription: Option<Value>,
    pub needs_to_acknowledge_policy: Option<bool>,
    pub suspended_until: Option<DateTime<Utc>>,
    pub hidden_characters: Vec<String>,
    pub blocked_users: Vec<String>,
}

impl HasAvatar for Profile {
    fn avatar_file_name(&self) -> Option<&str> {
        self.avatar_file_name.as_deref()
    }
}

/// The account behind the current token (`chat/user/`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawMe")]
pub enum Me {
    Anonymous,
    Guest(Guest),
    Profile(Box<Profile>),
}

impl Me {
    pub fn username(&self) -> &str {
        match self {
            Me::Anonymous => "ANONYMOUS",
            Me::Guest(g) => &g.username,
            Me::Profile(p) => &p.username,
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            Me::Anonymous => None,
            Me::Guest(g) => g.id,
            Me::Profile(p) => p.id,
        }
    }
}

fn strings(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect()
}

impl From<RawMe> for Me {
    fn from(raw: RawMe) -> Self {
        let info = raw.user;
        let user = info.user;

        if user.username == "ANONYMOUS" {
            return Me::Anonymous;
        }
        if user.username.starts_with("Guest") {
            return Me::Guest(Guest {
                username: user.username,
                id: user.id,
                name: info.name,
                email: info.email,
            });
        }

        let account = user.account.unwrap_or_default();
        Me::Profile(Box::new(Profile {
            username: user.username,
            id: user.id,
            name: info.name.or(account.name),
            first_name: user.first_name,
            avatar_type: account.avatar_type,
            avatar_file_name: account.avatar_file_name,
            onboarding_complete: account.onboarding_complete,
            mobile_onboarding_complete: account.mobile_onboarding_complete,
            bio: info.bio,
            is_staff: user.is_staff,
            is_human: info.is_human.unwrap_or(true),
            email: info.email,
            subscription: user.subscription,
            needs_to_acknowledge_policy: info.needs_to_acknowledge_policy,
            suspended_until: info.suspended_until,
            hidden_characters: strings(info.hidden_characters),
            blocked_users: strings(info.blocked_users),
        }))
    }
}

/// Fields accepted by `chat/user/update/`. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_rel_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// A persona: a character-shaped description of the user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub copyable: Option<bool>,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub avatar_file_name: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub default_voice_id: Option<String>,
    #[serde(default)]
    pub img_gen_enabled: Option<bool>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default, rename = "user__username")]
    pub username: Option<String>,
    #[serde(default, rename = "participant__name")]
    pub participant_name: Option<String>,
    #[serde(default)]
    pub num_interactions: Option<i64>,
}

impl HasAvatar for Persona {
    fn avatar_file_name(&self) -> Option<&str> {
        self.avatar_file_name.as_deref()
    }
}

/// Persona as listed by `chat/personas/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PersonaShort {
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub avatar_file_name: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default, rename = "participant__name")]
    pub name: Option<String>,
    #[serde(default, rename = "participant__num_interactions")]
    pub num_interactions: Option<f64>,
    #[serde(default, rename = "user__username")]
    pub username: Option<String>,
    #[serde(default)]
    pub is_persona: Option<bool>,
}

impl HasAvatar for PersonaShort {
    fn avatar_file_name(&self) -> Option<&str> {
        self.avatar_file_name.as_deref()
    }
}
