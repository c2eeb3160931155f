use crate::services::{field, ServiceContext};
use crate::transport::{ApiRequest, HttpTransport, TransportError};
use crate::types::media::Image;
use crate::Result;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use std::path::Path;
use tracing::{debug, info};

/// Image generation, uploads, downloads and the service health check.
#[derive(Debug, Clone, Copy)]
pub struct MediaService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> MediaService<'a> {
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

    /// Generate an image from a text prompt.
    pub async fn create_image(&self, prompt: &str) -> Result<Image> {
        let url: String = field(
            self.ctx
                .post("chat/generate-image/", json!({ "image_description": prompt }))
                .await?,
            "image_rel_path",
        )?;
        Ok(Image::created(url))
    }

    /// Upload a local PNG/JPEG/WebP file.
    pub async fn upload_image(&self, path: impl AsRef<Path>) -> Result<Image> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image.png")
            .to_string();
        self.upload_image_bytes(&name, data).await
    }

    /// Upload raw image bytes. The content type follows the extension of `file_name`
    /// (PNG, JPEG, WebP or GIF); anything else is sent as PNG.
    pub async fn upload_image_bytes(&self, file_name: &str, data: impl Into<Vec<u8>>) -> Result<Image> {
        let data = data.into();
        debug!(file_name, size = data.len(), "uploading image");
        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))
            .map_err(TransportError::Http)?;
        let form = Form::new().part("image", part);

        let response = self
            .ctx
            .transport()
            .upload("chat/upload-image/", form, self.ctx.token())
            .await?;
        let rel_path: String = field(response, "value")?;
        info!(rel_path = rel_path.as_str(), "image uploaded");
        Ok(Image::uploaded(rel_path))
    }

    /// Fetch an image from the CDN at the given width.
    pub async fn download(&self, image: &Image, width: u32) -> Result<Bytes> {
        let transport = self.ctx.transport();
        let url = image.download_url(transport.image_url(), width);
        transport.fetch_bytes(&url).await
    }

    /// True when the neo host answers `pong`.
    pub async fn ping(&self) -> Result<bool> {
        let data = self.ctx.call(ApiRequest::get("ping/").neo()).await?;
        Ok(data.get("status").and_then(Value::as_str) == Some("pong"))
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}
