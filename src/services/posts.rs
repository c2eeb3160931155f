use crate::services::{decode, field, field_or_body, query, ServiceContext};
use crate::transport::HttpTransport;
use crate::types::post::{Comment, Post, PostKind, PostThread, Topic};
use crate::Result;
use serde_json::json;

/// Community posts, comments and topic feeds.
#[derive(Debug, Clone, Copy)]
pub struct PostService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> PostService<'a> {
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

    /// A post and its comments.
    pub async fn get(&self, post_id: &str) -> Result<PostThread> {
        decode(
            self.ctx
                .get(format!("chat/post/?post={}", query(post_id)))
                .await?,
            "post",
        )
    }

    /// Posts by the current account.
    pub async fn mine(&self, page: u32, count: u32) -> Result<Vec<Post>> {
        field(
            self.ctx
                .get(format!(
                    "chat/posts/user/?scope=user&page={page}&posts_to_load={count}"
                ))
                .await?,
            "posts",
        )
    }

    pub async fn by_user(&self, username: &str, page: u32, count: u32) -> Result<Vec<Post>> {
        field(
            self.ctx
                .get(format!(
                    "chat/posts/user/?username={}&page={page}&posts_to_load={count}",
                    query(username)
                ))
                .await?,
            "posts",
        )
    }

    pub async fn upvote(&self, post_id: &str) -> Result<()> {
        self.ctx
            .post("chat/post/upvote/", json!({ "post_external_id": post_id }))
            .await?;
        Ok(())
    }

    pub async fn undo_upvote(&self, post_id: &str) -> Result<()> {
        self.ctx
            .post("chat/post/undo-upvote/", json!({ "post_external_id": post_id }))
            .await?;
        Ok(())
    }

    /// Comment on a post, optionally as a reply to comment `parent_uuid`.
    pub async fn comment(&self, post_id: &str, text: &str, parent_uuid: Option<&str>) -> Result<Comment> {
        let data = self
            .ctx
            .post(
                "chat/comment/create/",
                json!({
                    "post_external_id": post_id,
                    "text": text,
                    "parent_uuid": parent_uuid,
                }),
            )
            .await?;
        field_or_body(data, "comment")
    }

    pub async fn delete_comment(&self, comment_id: &str, post_id: &str) -> Result<()> {
        self.ctx
            .post(
                "chat/comment/delete/",
                json!({ "external_id": comment_id, "post_external_id": post_id }),
            )
            .await?;
        Ok(())
    }

    pub async fn create(&self, kind: &PostKind, title: &str) -> Result<Post> {
        let (path, body) = match kind {
            PostKind::Topic { topic_id, text } => (
                "chat/post/create/",
                json!({
                    "post_title": title,
                    "topic_external_id": topic_id,
                    "post_text": text,
                }),
            ),
            PostKind::Chat {
                subject_id,
                visibility,
            } => (
                "chat/chat-post/create/",
                json!({
                    "post_title": title,
                    "subject_external_id": subject_id,
                    "post_visibility": visibility,
                }),
            ),
        };
        field_or_body(self.ctx.post(path, body).await?, "post")
    }

    pub async fn delete(&self, post_id: &str) -> Result<()> {
        self.ctx
            .post("chat/post/delete/", json!({ "external_id": post_id }))
            .await?;
        Ok(())
    }

    pub async fn topics(&self) -> Result<Vec<Topic>> {
        field(self.ctx.get("chat/topics/").await?, "topics")
    }

    /// A topic's feed; `sort` is `"top"` or `"created"`.
    pub async fn feed(&self, topic: &str, page: u32, count: u32, sort: &str) -> Result<Vec<Post>> {
        field(
            self.ctx
                .get(format!(
                    "chat/posts/?topic={}&page={page}&posts_to_load={count}&sort={}",
                    query(topic),
                    query(sort)
                ))
                .await?,
            "posts",
        )
    }
}
