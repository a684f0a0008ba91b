//! HTTP transport types shared by the pipeline, the transport and the C ABI.
//!
//! # Design
//! Requests and responses are plain data. The interception stage mutates an
//! `HttpRequest` in place, a `Transport` turns it into an `HttpResponse`, and
//! classification reads the response without ever touching the network.
//!
//! All fields use owned types (`String`, `Vec`) so values can cross the FFI
//! boundary without lifetime concerns. Header lists keep insertion order;
//! lookups compare names case-insensitively.

use std::fmt;

use serde_json::Value;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Methods whose `data` travels as query parameters rather than a body.
    pub fn sends_data_as_query(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head | HttpMethod::Options)
    }

    /// Parse a method name, ignoring ASCII case.
    pub fn parse(s: &str) -> Option<Self> {
        let method = match s.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            "PATCH" => HttpMethod::Patch,
            _ => return None,
        };
        Some(method)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header list.
pub type Headers = Vec<(String, String)>;

/// Return the first value stored under `name`, comparing names case-insensitively.
pub fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Set `name` to `value`, dropping any existing entries with the same name.
pub fn set_header(headers: &mut Headers, name: &str, value: &str) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value.to_string()));
}

/// One outgoing call before dispatch.
///
/// Built by an endpoint function, normalized once by the `Interceptor`, then
/// consumed by a `Transport`. A relative `url` is resolved against the base
/// URL during interception.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub data: Option<Value>,
    pub headers: Headers,
    pub timeout_ms: Option<u64>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            data: None,
            headers: Vec::new(),
            timeout_ms: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        set_header(&mut self.headers, name, value);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }
}

/// A multipart file upload. Receives the same interception as `HttpRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub url: String,
    pub file_path: String,
    /// Form field name carrying the file.
    pub name: String,
    pub form_data: Vec<(String, String)>,
    pub headers: Headers,
    pub timeout_ms: Option<u64>,
}

impl UploadRequest {
    pub fn new(url: impl Into<String>, file_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            file_path: file_path.into(),
            name: name.into(),
            form_data: Vec::new(),
            headers: Vec::new(),
            timeout_ms: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }
}

/// A server response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }
}
