//! Transport-neutral request/response values
//!
//! Every upstream call is described as an `ApiRequest` so the same code path
//! runs against reqwest in production and the scripted transport in tests.

use crate::errors::{EpicError, EpicResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Authorization header value. Epic expects the lowercase scheme names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Basic(String),
    Bearer(String),
}

impl Authorization {
    pub fn header_value(&self) -> String {
        match self {
            Authorization::Basic(token) => format!("basic {}", token),
            Authorization::Bearer(token) => format!("bearer {}", token),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    None,
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// `application/json`
    Json(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<Authorization>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            query: Vec::new(),
            authorization: None,
            body: RequestBody::None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(url)
        }
    }

    pub fn basic(mut self, token: &str) -> Self {
        self.authorization = Some(Authorization::Basic(token.to_string()));
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.authorization = Some(Authorization::Bearer(token.to_string()));
        self
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn form(mut self, pairs: &[(&str, &str)]) -> Self {
        self.body = RequestBody::Form(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Value of a form field, if the body is a form
    pub fn form_value(&self, key: &str) -> Option<&str> {
        match &self.body {
            RequestBody::Form(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Short description for logs; never includes credentials or bodies
    pub fn describe(&self) -> String {
        format!("{} {}", self.method.as_str(), self.url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as `T`; `document` names the shape in the error
    pub fn json<T: DeserializeOwned>(&self, document: &str) -> EpicResult<T> {
        serde_json::from_str(&self.body).map_err(|e| EpicError::parse(document, e))
    }

    /// Maps any non-2xx status to `UpstreamUnavailable`
    pub fn ensure_success(self, endpoint: &str) -> EpicResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(EpicError::UpstreamUnavailable {
            endpoint: endpoint.to_string(),
            status: self.status,
            body: truncate_body(&self.body),
        })
    }
}

/// Upstream error bodies can be large HTML pages
pub fn truncate_body(body: &str) -> String {
    const MAX_BODY_CHARS: usize = 300;
    if body.chars().count() <= MAX_BODY_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_BODY_CHARS).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_schemes_are_lowercase() {
        assert_eq!(Authorization::Basic("abc".into()).header_value(), "basic abc");
        assert_eq!(Authorization::Bearer("xyz".into()).header_value(), "bearer xyz");
    }

    #[test]
    fn test_builder() {
        let request = ApiRequest::post("https://example.com/token")
            .basic("creds")
            .form(&[("grant_type", "device_code"), ("device_code", "dc-1")]);

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.form_value("grant_type"), Some("device_code"));
        assert_eq!(request.form_value("device_code"), Some("dc-1"));
        assert_eq!(request.form_value("missing"), None);
        assert_eq!(request.describe(), "POST https://example.com/token");
    }

    #[test]
    fn test_ensure_success() {
        assert!(ApiResponse::new(204, "").ensure_success("x").is_ok());

        match ApiResponse::new(503, "down").ensure_success("QueryProfile") {
            Err(EpicError::UpstreamUnavailable {
                endpoint, status, ..
            }) => {
                assert_eq!(endpoint, "QueryProfile");
                assert_eq!(status, 503);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_json_parse_error_names_document() {
        let err = ApiResponse::new(200, "not json")
            .json::<serde_json::Value>("token response")
            .unwrap_err();
        assert!(matches!(err, EpicError::Parse { ref document, .. } if document == "token response"));
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(400);
        assert_eq!(truncate_body(&long).chars().count(), 301);
        assert_eq!(truncate_body("short"), "short");
    }
}
