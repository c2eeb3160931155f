use serde::{Deserialize, Serialize};

/// Where an image came from. Uploaded images and avatars live on the static CDN path;
/// generated images are addressed by a full URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageKind {
    #[default]
    Uploaded,
    Created,
}

/// An image reference returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Relative path for uploaded images and avatars, absolute URL for generated ones.
    pub url: String,
    #[serde(default)]
    pub kind: ImageKind,
    /// CDN folder: `user` for uploads, `avatars` for avatars.
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    "user".to_string()
}

impl Image {
    pub fn uploaded(path: impl Into<String>) -> Self {
        Self {
            url: path.into(),
            kind: ImageKind::Uploaded,
            icon: default_icon(),
        }
    }

    pub fn created(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: ImageKind::Created,
            icon: default_icon(),
        }
    }

    pub fn avatar(path: impl Into<String>) -> Self {
        Self {
            url: path.into(),
            kind: ImageKind::Uploaded,
            icon: "avatars".to_string(),
        }
    }

    /// Full download URL at the given width, relative to the CDN base.
    pub fn download_url(&self, cdn_base: &str, width: u32) -> String {
        match self.kind {
            ImageKind::Created => self.url.clone(),
            ImageKind::Uploaded => format!(
                "{}/{}/static/{}/{}",
                cdn_base.trim_end_matches('/'),
                width,
                self.icon,
                self.url.trim_start_matches('/')
            ),
        }
    }

    /// Last path segment, handy as a local file name.
    pub fn file_name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}

/// Records carrying an `avatar_file_name`.
pub trait HasAvatar {
    fn avatar_file_name(&self) -> Option<&str>;

    fn avatar(&self) -> Option<Image> {
        self.avatar_file_name()
            .filter(|p| !p.is_empty())
            .map(Image::avatar)
    }
}
