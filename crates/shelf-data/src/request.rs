//! Outbound HTTP request.

use std::time::Duration;

use serde::Serialize;

use crate::FetchError;

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    /// Parse an uppercase method name.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "PATCH" => Some(Method::Patch),
            "DELETE" => Some(Method::Delete),
            "HEAD" => Some(Method::Head),
            "OPTIONS" => Some(Method::Options),
            _ => None,
        }
    }
}

/// A fully described outbound request, handed to an [`crate::HttpTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    /// Header pairs in insertion order; names are unique case-insensitively.
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    /// Total deadline the transport must enforce.
    pub timeout: Option<Duration>,
}

impl OutboundRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Set a header, replacing any existing value with the same name.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Set the header only when it is not present yet.
    pub fn default_header(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if self.header_value(&key).is_some() {
            return self;
        }
        self.header(key, value)
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)?;
        self.body = Some(json);
        Ok(self.header("Content-Type", "application/json"))
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Parsed JSON body, for transports and assertions.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_replaces_case_insensitively() {
        let req = OutboundRequest::get("https://x.example")
            .header("User-Agent", "a")
            .header("user-agent", "b");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header_value("USER-AGENT"), Some("b"));
    }

    #[test]
    fn test_default_header_keeps_existing() {
        let req = OutboundRequest::get("https://x.example")
            .header("Accept", "image/png")
            .default_header("accept", "*/*");
        assert_eq!(req.header_value("Accept"), Some("image/png"));
    }

    #[test]
    fn test_json_body() {
        let req = OutboundRequest::post("https://x.example")
            .json(&serde_json::json!({"page_size": 100}))
            .unwrap();
        assert_eq!(req.header_value("content-type"), Some("application/json"));
        assert_eq!(req.json_body().unwrap()["page_size"], 100);
    }

    #[test]
    fn test_bearer_auth() {
        let req = OutboundRequest::get("https://x.example").bearer_auth("secret");
        assert_eq!(req.header_value("Authorization"), Some("Bearer secret"));
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("get"), Some(Method::Get));
        assert_eq!(Method::parse("BREW"), None);
        assert_eq!(Method::Post.as_str(), "POST");
    }
}
