use crate::config::ClientConfig;
use crate::transport::envelope::{message_of, Envelope};
use crate::transport::stream;
use crate::transport::TransportError;
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::multipart::Form;
use reqwest::Proxy;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Marker of the Cloudflare interstitial served while the service is overloaded.
const WAITING_ROOM_MARKER: &str = "Waiting Room";

/// Which of the two API hosts a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    Rest,
    Neo,
}

impl Host {
    fn as_str(self) -> &'static str {
        match self {
            Host::Rest => "rest",
            Host::Neo => "neo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
}

/// A single REST call: relative path, verb, host, optional JSON body and token override.
#[derive(Debug, Clone)]
pub struct ApiRequest<'a> {
    pub path: String,
    pub verb: Verb,
    pub host: Host,
    pub body: Option<Value>,
    pub token: Option<&'a str>,
    /// Body is newline-delimited JSON; keep only the last complete object.
    pub streamed: bool,
}

impl<'a> ApiRequest<'a> {
    fn new(verb: Verb, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            path: path.into(),
            verb,
            host: Host::Rest,
            body,
            token: None,
            streamed: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Verb::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Verb::Post, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Verb::Put, path, Some(body))
    }

    pub fn neo(mut self) -> Self {
        self.host = Host::Neo;
        self
    }

    pub fn token(mut self, token: Option<&'a str>) -> Self {
        self.token = token;
        self
    }

    pub fn streamed(mut self) -> Self {
        self.streamed = true;
        self
    }
}

/// Authenticated HTTP transport shared by every service.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    rest_url: String,
    neo_url: String,
    image_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(config.user_agent());

        if let Some(proxy_url) = &config.proxy {
            match Proxy::all(proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => warn!(error = %e, "ignoring invalid proxy url"),
            }
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            rest_url: config.rest_url.clone(),
            neo_url: config.neo_url.clone(),
            image_url: config.image_url.clone(),
            token: config.token.clone(),
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Per-call override first, then the configured token.
    pub(crate) fn resolve_token<'t>(&'t self, override_token: Option<&'t str>) -> Result<&'t str> {
        override_token
            .or(self.token.as_deref())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::authentication("no token configured"))
    }

    pub fn url_for(&self, host: Host, path: &str) -> String {
        let base = match host {
            Host::Rest => &self.rest_url,
            Host::Neo => &self.neo_url,
        };
        join_url(base, path)
    }

    /// Perform the call and return the decoded, error-checked JSON value.
    pub async fn request(&self, req: ApiRequest<'_>) -> Result<Value> {
        let (status, text) = self.send(&req, None).await?;
        decode_body(status, &text, &req)
    }

    /// Perform the call and return the raw body text after status checks, for callers
    /// that need to inspect every line of a streamed response themselves.
    pub async fn request_text(&self, req: ApiRequest<'_>) -> Result<String> {
        let (_, text) = self.send(&req, None).await?;
        if text.contains(WAITING_ROOM_MARKER) {
            return Err(Error::overloaded("waiting room").with_context(context_for(&req)));
        }
        Ok(text)
    }

    /// POST a multipart form (image uploads) and decode the JSON answer.
    pub async fn upload(&self, path: &str, form: Form, token: Option<&str>) -> Result<Value> {
        let req = ApiRequest::new(Verb::Post, path, None).token(token);
        let (status, text) = self.send(&req, Some(form)).await?;
        decode_body(status, &text, &req)
    }

    /// Unauthenticated GET of an absolute URL (image CDN).
    pub async fn fetch_bytes(&self, url: &str) -> Result<Bytes> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(TransportError::Http)?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let ctx = ErrorContext::new()
                .with_endpoint(url)
                .with_status_code(status)
                .with_source("http");
            return Err(if status == 404 {
                Error::not_found(format!("no resource at {url}")).with_context(ctx)
            } else {
                Error::server(format!("HTTP {status}")).with_context(ctx)
            });
        }
        Ok(resp.bytes().await.map_err(TransportError::Http)?)
    }

    async fn send(&self, req: &ApiRequest<'_>, form: Option<Form>) -> Result<(u16, String)> {
        let token = self.resolve_token(req.token)?;
        let url = self.url_for(req.host, &req.path);

        let mut builder = match req.verb {
            Verb::Get => self.client.get(&url),
            Verb::Post => self.client.post(&url),
            Verb::Put => self.client.put(&url),
        }
        .header(AUTHORIZATION, format!("Token {token}"))
        .header(ACCEPT, "application/json");

        if let Some(form) = form {
            builder = builder.multipart(form);
        } else if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        debug!(host = req.host.as_str(), endpoint = req.path.as_str(), "sending request");
        let start = Instant::now();
        let resp = builder.send().await.map_err(TransportError::Http)?;
        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(TransportError::Http)?;

        if !(200..300).contains(&status) {
            info!(
                http_status = status,
                host = req.host.as_str(),
                endpoint = req.path.as_str(),
                duration_ms = start.elapsed().as_millis(),
                "request failed"
            );
            return Err(error_for_status(status, &text).with_context(
                context_for(req).with_status_code(status),
            ));
        }

        debug!(
            http_status = status,
            host = req.host.as_str(),
            endpoint = req.path.as_str(),
            duration_ms = start.elapsed().as_millis(),
            "request completed"
        );
        Ok((status, text))
    }
}

fn context_for(req: &ApiRequest<'_>) -> ErrorContext {
    ErrorContext::new()
        .with_endpoint(req.path.clone())
        .with_source(req.host.as_str())
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Map a non-2xx response to a typed error.
pub(crate) fn error_for_status(status: u16, body: &str) -> Error {
    if body.contains(WAITING_ROOM_MARKER) {
        return Error::overloaded("waiting room");
    }
    let message = body_message(body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body.trim().to_string()
        }
    });
    match status {
        401 | 403 => Error::authentication(message),
        404 => Error::not_found(message),
        429 | 503 => Error::overloaded(message),
        _ => Error::server(message),
    }
}

/// Service-provided message of an error body, if it has a known shape.
fn body_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;
    ["comment", "error", "detail", "status"]
        .iter()
        .find_map(|k| obj.get(*k).filter(|v| !v.is_null()).map(message_of))
}

/// Decode a 2xx body and run envelope classification on it.
pub(crate) fn decode_body(status: u16, text: &str, req: &ApiRequest<'_>) -> Result<Value> {
    if text.contains(WAITING_ROOM_MARKER) {
        return Err(Error::overloaded("waiting room").with_context(context_for(req)));
    }
    if text.trim().is_empty() {
        return Err(Error::malformed(
            format!("empty response body from {} (HTTP {status})", req.path),
            text,
        ));
    }

    let value = if req.streamed {
        stream::last_complete_object(text).ok_or_else(|| {
            Error::malformed(format!("unable to decode JSON from {}", req.path), text)
        })?
    } else {
        serde_json::from_str::<Value>(text).map_err(|e| {
            Error::malformed(
                format!("unable to decode JSON from {}: {e}", req.path),
                text,
            )
        })?
    };

    Envelope::classify(value)
        .into_result()
        .map_err(|e| e.with_context(context_for(req).with_status_code(status)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn join_handles_slashes() {
        assert_eq!(join_url("https://h/", "/chat/user/"), "https://h/chat/user/");
        assert_eq!(join_url("http://127.0.0.1:1", "ping/"), "http://127.0.0.1:1/ping/");
    }

    #[test]
    fn status_mapping() {
        assert_eq!(error_for_status(401, "").kind(), ErrorKind::Authentication);
        assert_eq!(error_for_status(404, "").kind(), ErrorKind::NotFound);
        assert_eq!(error_for_status(503, "").kind(), ErrorKind::Overloaded);
        let err = error_for_status(500, r#"{"command": "neo_error", "comment": "chat locked"}"#);
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.server_message(), Some("chat locked"));
        assert_eq!(
            error_for_status(502, "").server_message(),
            Some("HTTP 502")
        );
    }

    #[test]
    fn waiting_room_is_overload_even_on_200() {
        let req = ApiRequest::get("chat/user/");
        let html = "<html><title>Waiting Room powered by Cloudflare</title></html>";
        assert_eq!(
            decode_body(200, html, &req).unwrap_err().kind(),
            ErrorKind::Overloaded
        );
    }
}
