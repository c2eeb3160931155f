use crate::types::character::CharacterShort;
use crate::types::media::HasAvatar;
use serde::Deserialize;

/// Public profile of another user (`chat/user/public/`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PublicUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub characters: Vec<CharacterShort>,
    #[serde(default)]
    pub num_following: Option<i64>,
    #[serde(default)]
    pub num_followers: Option<i64>,
    #[serde(default)]
    pub avatar_file_name: Option<String>,
    #[serde(default)]
    pub subscription_type: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub creator_info: Option<String>,
}

impl HasAvatar for PublicUser {
    fn avatar_file_name(&self) -> Option<&str> {
        self.avatar_file_name.as_deref()
    }
}
