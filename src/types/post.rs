//! Community posts and topics.
//!
//! These endpoints return loosely structured objects; the common fields are typed
//! and everything else stays reachable through `extra`.

use crate::types::timestamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub external_id: String,
    #[serde(default, alias = "post_title")]
    pub title: Option<String>,
    #[serde(default, alias = "post_text")]
    pub text: Option<String>,
    #[serde(default, rename = "poster__username")]
    pub poster_username: Option<String>,
    #[serde(default, rename = "topic__external_id")]
    pub topic_id: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub upvotes: Option<i64>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub created: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "src__user__username")]
    pub author_username: Option<String>,
    #[serde(default)]
    pub parent_uuid: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub created: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A post together with its comment thread (`chat/post/?post=`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PostThread {
    #[serde(default)]
    pub post: Post,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What a new post is about: a topic with body text, or a shared chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostKind {
    Topic { topic_id: String, text: String },
    Chat { subject_id: String, visibility: String },
}

impl PostKind {
    pub fn topic(topic_id: impl Into<String>, text: impl Into<String>) -> Self {
        PostKind::Topic {
            topic_id: topic_id.into(),
            text: text.into(),
        }
    }

    /// Share a chat publicly.
    pub fn chat(subject_id: impl Into<String>) -> Self {
        PostKind::Chat {
            subject_id: subject_id.into(),
            visibility: "PUBLIC".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_post_fields_stay_reachable() {
        let post: Post = serde_json::from_value(json!({
            "external_id": "p1",
            "post_title": "Hello",
            "poster__username": "alice",
            "is_upvoted": true
        }))
        .unwrap();
        assert_eq!(post.title.as_deref(), Some("Hello"));
        assert_eq!(post.poster_username.as_deref(), Some("alice"));
        assert_eq!(post.extra["is_upvoted"], json!(true));
    }
}
