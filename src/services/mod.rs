//! 服务模块：按领域划分的 REST 接口。
//!
//! # Services Module
//!
//! Each service borrows the client's shared [`HttpTransport`] and groups one area of
//! the REST surface. All of them accept `.with_token(..)` to run a call under a
//! different account than the client's default.
//!
//! | Service | Accessor |
//! |---------|----------|
//! | [`AccountService`] | `client.account()` |
//! | [`CharacterService`] | `client.characters()` |
//! | [`UserService`] | `client.users()` |
//! | [`PostService`] | `client.posts()` |
//! | [`RecentService`] | `client.recent()` |
//! | [`MediaService`] | `client.media()` |
//! | [`Chat1Service`] | `client.chat1()` |
//! | [`Chat2Service`] | `client.chat2()` |

pub mod account;
pub mod characters;
pub mod chat1;
pub mod chat2;
pub mod media;
pub mod posts;
pub mod recent;
pub mod users;

pub use account::AccountService;
pub use characters::CharacterService;
pub use chat1::{Chat1Service, MessageOptions};
pub use chat2::Chat2Service;
pub use media::MediaService;
pub use posts::PostService;
pub use recent::RecentService;
pub use users::UserService;

use crate::transport::{ApiRequest, HttpTransport};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Transport plus the token override shared by every service.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ServiceContext<'a> {
    transport: &'a HttpTransport,
    token: Option<&'a str>,
}

impl<'a> ServiceContext<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    pub(crate) fn with_token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    pub(crate) fn transport(&self) -> &'a HttpTransport {
        self.transport
    }

    pub(crate) fn token(&self) -> Option<&'a str> {
        self.token
    }

    pub(crate) async fn call(&self, req: ApiRequest<'a>) -> Result<Value> {
        self.transport.request(req.token(self.token)).await
    }

    pub(crate) async fn get(&self, path: impl Into<String>) -> Result<Value> {
        self.call(ApiRequest::get(path)).await
    }

    pub(crate) async fn post(&self, path: impl Into<String>, body: Value) -> Result<Value> {
        self.call(ApiRequest::post(path, body)).await
    }
}

/// Decode a whole response body into a record.
pub(crate) fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value::<T>(value.clone())
        .map_err(|e| Error::malformed(format!("unable to decode {what}: {e}"), value.to_string()))
}

/// Take `key` out of a response object and decode it.
pub(crate) fn field<T: DeserializeOwned>(mut value: Value, key: &str) -> Result<T> {
    match value.get_mut(key).map(Value::take) {
        Some(inner) if !inner.is_null() => decode(inner, key),
        _ => Err(Error::malformed(
            format!("response has no `{key}`"),
            value.to_string(),
        )),
    }
}

/// Like [`field`], but falls back to the whole body when `key` is absent.
pub(crate) fn field_or_body<T: DeserializeOwned>(value: Value, key: &str) -> Result<T> {
    if value.get(key).is_some_and(|v| !v.is_null()) {
        field(value, key)
    } else {
        decode(value, key)
    }
}

/// Percent-encode a query parameter value.
pub(crate) fn query(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;

    #[test]
    fn field_extracts_and_reports_missing_keys() {
        let names: Vec<String> = field(json!({"names": ["a", "b"]}), "names").unwrap();
        assert_eq!(names, vec!["a", "b"]);

        let err = field::<Vec<String>>(json!({"other": 1}), "names").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn query_values_are_encoded() {
        assert_eq!(query("a b&c"), "a+b%26c");
    }
}
