use crate::base::modelerror::ModelError;
use crate::collection::property::{json_type, PropertyDescriptor, PropertyKind};
use crate::collection::{ObjectOptions, PropertyList, UpsertOutcome};
use crate::http::header::{Header, HeaderFilter};
use crate::http::querystring::{QueryInput, QueryKeys};
use crate::http::requesturl::RequestUrl;
use ::http::header::{HeaderName, HeaderValue};
use ::http::HeaderMap;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::str::FromStr;

const DEFAULT_METHOD: &str = "GET";

#[derive(Debug, Default, Deserialize)]
struct RequestDescriptor {
    #[serde(default)]
    url: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    header: Option<Value>,
    #[serde(default)]
    body: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    proxy: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// An API request: method, URL, headers and an opaque body.
///
/// Cloning is deep; a clone shares nothing with the original.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub url: RequestUrl,
    pub headers: PropertyList<Header>,
    pub body: Option<Value>,
    pub description: Option<Value>,
    pub proxy: Option<Value>,
    pub extra: Map<String, Value>,
    /// The input carried a `header` field, so `to_json` emits one even when
    /// the list is empty.
    header_given: bool,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
            url: RequestUrl::default(),
            headers: PropertyList::new(),
            body: None,
            description: None,
            proxy: None,
            extra: Map::new(),
            header_given: false,
        }
    }
}

impl Request {
    /// An empty `GET` request.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Build from JSON: `null`, a bare URL string, or a request object.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        let descriptor = match value {
            Value::Null => RequestDescriptor::default(),
            Value::String(url) => RequestDescriptor {
                url: Some(Value::String(url)),
                ..Default::default()
            },
            Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| ModelError::invalid_construction("Request", e.to_string()))?,
            other => {
                return Err(ModelError::invalid_construction(
                    "Request",
                    format!("expected a string or an object, got {}", json_type(&other)),
                ))
            }
        };

        let header_given = descriptor.header.is_some();
        let request = Self {
            method: descriptor
                .method
                .map(|m| m.to_uppercase())
                .unwrap_or_else(|| DEFAULT_METHOD.to_string()),
            url: RequestUrl::from_value(descriptor.url.unwrap_or(Value::Null))?,
            headers: PropertyList::from_value(descriptor.header.unwrap_or(Value::Null))?,
            body: descriptor.body,
            description: descriptor.description,
            proxy: descriptor.proxy,
            extra: descriptor.extra,
            header_given,
        };
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            headers = request.headers.count(),
            "request built from JSON"
        );
        Ok(request)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("url".to_string(), self.url.to_json());
        object.insert("method".to_string(), Value::String(self.method.clone()));
        if self.header_given || !self.headers.is_empty() {
            object.insert("header".to_string(), self.headers.to_json());
        }
        if let Some(body) = &self.body {
            object.insert("body".to_string(), body.clone());
        }
        if let Some(description) = &self.description {
            object.insert("description".to_string(), description.clone());
        }
        if let Some(proxy) = &self.proxy {
            object.insert("proxy".to_string(), proxy.clone());
        }
        for (name, value) in &self.extra {
            object
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        Value::Object(object)
    }

    pub fn add_header(&mut self, header: Header) {
        self.headers.add(header);
    }

    pub fn remove_header(&mut self, key: &str) -> Option<Header> {
        self.headers.remove(key)
    }

    /// Add the header if its key is new, else overwrite the existing value in
    /// place. `None` does nothing.
    pub fn upsert_header(
        &mut self,
        header: Option<PropertyDescriptor>,
    ) -> Result<Option<UpsertOutcome>, ModelError> {
        self.headers.upsert(header)
    }

    /// Header names mapped to values.
    pub fn get_headers(&self, filter: HeaderFilter) -> IndexMap<String, String> {
        self.headers
            .to_object(ObjectOptions {
                enabled: filter.enabled,
                ignore_case: filter.ignore_case,
            })
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect()
    }

    pub fn add_query_params(&mut self, input: impl Into<QueryInput>) {
        self.url.add_query_params(input);
    }

    pub fn remove_query_params(&mut self, keys: impl Into<QueryKeys>) {
        self.url.remove_query_params(keys);
    }

    /// Enabled headers as an [`http::HeaderMap`], in list order.
    pub fn to_header_map(&self) -> Result<HeaderMap, ModelError> {
        let mut map = HeaderMap::with_capacity(self.headers.count());
        for header in self.headers.iter().filter(|h| !h.is_disabled()) {
            let name = HeaderName::from_str(&header.key)
                .map_err(|_| ModelError::invalid_header(header.key.as_str()))?;
            let value = HeaderValue::from_str(&header.value)
                .map_err(|_| ModelError::invalid_header(header.key.as_str()))?;
            map.append(name, value);
        }
        Ok(map)
    }
}

/// Builder for creating a [`Request`] in code.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<String>,
    url: Option<String>,
    headers: Vec<Header>,
    body: Option<Value>,
    description: Option<Value>,
}

impl RequestBuilder {
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(key, value));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Value::String(description.into()));
        self
    }

    pub fn build(self) -> Request {
        let header_given = !self.headers.is_empty();
        Request {
            method: self
                .method
                .map(|m| m.to_uppercase())
                .unwrap_or_else(|| DEFAULT_METHOD.to_string()),
            url: self
                .url
                .as_deref()
                .map(RequestUrl::parse)
                .unwrap_or_default(),
            headers: self.headers.into_iter().collect(),
            body: self.body,
            description: self.description,
            proxy: None,
            extra: Map::new(),
            header_given,
        }
    }
}
