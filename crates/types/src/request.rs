//! Fully-formed request descriptors.
//!
//! A [`RequestPlan`] is the pure output of the operation mapper: everything an
//! HTTP client needs to dispatch a call, with no I/O of its own. Plans are
//! serializable so dry runs can print exactly what would be sent.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Request payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestBody {
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// One part of a multipart form body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormValue {
    /// Inline text value.
    Text(String),
    /// Local file streamed as the part's content.
    File(PathBuf),
}

/// An assembled HTTP request, relative to an environment base URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPlan {
    /// HTTP method (e.g. "GET", "POST", "PATCH").
    pub method: String,
    /// Endpoint path (e.g. "/get-allowance").
    pub path: String,
    /// Query string pairs, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<(String, String)>,
    /// Request payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    /// Additional headers beyond the client defaults.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,
}

impl RequestPlan {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: IndexMap::new(),
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn with_multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }

    /// The JSON payload, when the body is JSON.
    pub fn body_json(&self) -> Option<&Value> {
        match &self.body {
            Some(RequestBody::Json(value)) => Some(value),
            _ => None,
        }
    }

    /// Render the absolute URL against a base, appending query pairs.
    pub fn url(&self, base: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base)?;
        url.set_path(&self.path);
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }
}
