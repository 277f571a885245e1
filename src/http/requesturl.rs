use crate::base::modelerror::ModelError;
use crate::collection::property::json_type;
use crate::collection::PropertyList;
use crate::http::querystring::{self, QueryInput, QueryKeys, QueryParam};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// The shape the URL was built from, so `to_json` can hand the same shape back.
#[derive(Debug, Clone, PartialEq)]
enum UrlForm {
    Raw,
    Object {
        extra: Map<String, Value>,
        query_given: bool,
    },
}

#[derive(Debug, Default, Deserialize)]
struct UrlDescriptor {
    #[serde(default)]
    raw: Option<String>,
    #[serde(default)]
    query: Option<Value>,
    #[serde(default)]
    hash: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// A request URL split into base, query list and fragment.
///
/// Only the query is modeled; everything before `?` is kept as written, which
/// lets unresolved `{{variables}}` survive.
///
/// The query is a key-unique list, so rendering normalizes it: a repeated key
/// keeps its first position and last value (`a.com?x=1&x=2` renders as
/// `a.com?x=2`), empty segments are dropped (`a=1&&b=2` renders as `a=1&b=2`)
/// and a bare trailing `?` disappears.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestUrl {
    base: String,
    pub query: PropertyList<QueryParam>,
    pub hash: Option<String>,
    form: UrlForm,
}

impl Default for RequestUrl {
    fn default() -> Self {
        Self {
            base: String::new(),
            query: PropertyList::new(),
            hash: None,
            form: UrlForm::Raw,
        }
    }
}

impl RequestUrl {
    /// Split a raw URL. The fragment is cut first, then the query.
    pub fn parse(raw: &str) -> Self {
        let (rest, hash) = match raw.split_once('#') {
            Some((rest, hash)) => (rest, Some(hash.to_string())),
            None => (raw, None),
        };
        let (base, query) = rest.split_once('?').unwrap_or((rest, ""));
        Self {
            base: base.to_string(),
            query: querystring::parse(query).into_iter().collect(),
            hash,
            form: UrlForm::Raw,
        }
    }

    /// Build from JSON: `null`, a raw string, or an object with `raw`, `query`
    /// and `hash`. Other object fields are kept as they are.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::String(raw) => Ok(Self::parse(&raw)),
            Value::Object(_) => {
                let descriptor: UrlDescriptor = serde_json::from_value(value)
                    .map_err(|e| ModelError::invalid_construction("Url", e.to_string()))?;
                let mut url = Self::parse(descriptor.raw.as_deref().unwrap_or_default());
                let query_given = descriptor.query.is_some();
                if let Some(query) = descriptor.query {
                    url.query = PropertyList::from_value(query)?;
                }
                if descriptor.hash.is_some() {
                    url.hash = descriptor.hash;
                }
                url.form = UrlForm::Object {
                    extra: descriptor.extra,
                    query_given,
                };
                Ok(url)
            }
            other => Err(ModelError::invalid_construction(
                "Url",
                format!("expected a string or an object, got {}", json_type(&other)),
            )),
        }
    }

    /// Everything before the `?`.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Enabled query parameters joined with `&`, no leading `?`.
    pub fn query_string(&self) -> String {
        querystring::unparse(&self.query)
    }

    pub fn add_query_params(&mut self, input: impl Into<QueryInput>) {
        querystring::add_query_params(&mut self.query, input);
    }

    pub fn remove_query_params(&mut self, keys: impl Into<QueryKeys>) {
        querystring::remove_query_params(&mut self.query, keys);
    }

    /// Resolve into a [`url::Url`]. Fails on relative or templated URLs.
    pub fn to_url(&self) -> Result<url::Url, ModelError> {
        let raw = self.to_string();
        url::Url::parse(&raw).map_err(|e| ModelError::invalid_url(raw.clone(), e.to_string()))
    }

    pub fn to_json(&self) -> Value {
        match &self.form {
            UrlForm::Raw => Value::String(self.to_string()),
            UrlForm::Object { extra, query_given } => {
                let mut object = Map::new();
                object.insert("raw".to_string(), Value::String(self.to_string()));
                if *query_given || !self.query.is_empty() {
                    object.insert("query".to_string(), self.query.to_json());
                }
                if let Some(hash) = &self.hash {
                    object.insert("hash".to_string(), Value::String(hash.clone()));
                }
                for (name, value) in extra {
                    object.entry(name.clone()).or_insert_with(|| value.clone());
                }
                Value::Object(object)
            }
        }
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        let query = self.query_string();
        if !query.is_empty() {
            write!(f, "?{}", query)?;
        }
        if let Some(hash) = &self.hash {
            write!(f, "#{}", hash)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_splits_parts() {
        let url = RequestUrl::parse("https://example.com/get?a=1&b#top");
        assert_eq!(url.base(), "https://example.com/get");
        assert_eq!(url.query.count(), 2);
        assert_eq!(url.hash.as_deref(), Some("top"));
        assert_eq!(url.to_string(), "https://example.com/get?a=1&b#top");
    }

    #[test]
    fn test_query_in_fragment_stays_in_fragment() {
        let url = RequestUrl::parse("http://a.com/#/route?x=1");
        assert!(url.query.is_empty());
        assert_eq!(url.hash.as_deref(), Some("/route?x=1"));
    }

    #[test]
    fn test_string_form_round_trips() {
        let raw = json!("postman-echo.com/get?foo=bar");
        assert_eq!(RequestUrl::from_value(raw.clone()).unwrap().to_json(), raw);
    }

    #[test]
    fn test_object_form_round_trips() {
        let raw = json!({
            "raw": "https://{{host}}/get?foo=bar",
            "protocol": "https",
            "host": ["{{host}}"],
            "path": ["get"],
            "query": [{ "key": "foo", "value": "bar" }]
        });
        assert_eq!(RequestUrl::from_value(raw.clone()).unwrap().to_json(), raw);
    }

    #[test]
    fn test_empty_query_array_is_kept() {
        let raw = json!({ "raw": "https://a.com/get", "query": [] });
        let url = RequestUrl::from_value(raw.clone()).unwrap();
        assert_eq!(url.to_json()["query"], json!([]));
        assert_eq!(url.to_json(), raw);

        let bare = RequestUrl::from_value(json!({ "raw": "https://a.com/get" })).unwrap();
        assert!(bare.to_json().get("query").is_none());
    }

    #[test]
    fn test_string_form_normalizes_query() {
        assert_eq!(RequestUrl::parse("a.com?").to_string(), "a.com");
        assert_eq!(RequestUrl::parse("a.com?x=1&x=2").to_string(), "a.com?x=2");
        assert_eq!(RequestUrl::parse("a.com?a=1&&b=2").to_string(), "a.com?a=1&b=2");
    }

    #[test]
    fn test_object_query_overrides_raw() {
        let url = RequestUrl::from_value(json!({
            "raw": "http://a.com?old=1",
            "query": [{ "key": "new", "value": "2" }]
        }))
        .unwrap();
        assert_eq!(url.to_string(), "http://a.com?new=2");
    }

    #[test]
    fn test_rejects_number() {
        assert!(RequestUrl::from_value(json!(7)).unwrap_err().is_invalid_construction());
    }

    #[test]
    fn test_to_url() {
        let url = RequestUrl::parse("https://example.com/a?b=c");
        assert_eq!(url.to_url().unwrap().query(), Some("b=c"));

        let err = RequestUrl::parse("{{host}}/a").to_url().unwrap_err();
        assert!(matches!(err, ModelError::InvalidUrl { .. }));
    }
}
