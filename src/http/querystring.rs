//! Query-string codec.
//!
//! A query is split on `&`, each segment on its first `=`. A segment without
//! `=` has no value (`null` in JSON). Values pass through verbatim: no percent
//! decoding or encoding happens here.

use crate::base::modelerror::ModelError;
use crate::collection::property::{json_type, PropertyDescriptor, PropertyKind};
use crate::collection::PropertyList;
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParam {
    pub key: String,
    pub value: Option<String>,
    /// `None` when the input carried no `disabled` field.
    pub disabled: Option<bool>,
    pub description: Option<String>,
    pub extra: Map<String, Value>,
}

impl QueryParam {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// A parameter with no `=value` part.
    pub fn key_only(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn parse_single(segment: &str) -> Self {
        match segment.split_once('=') {
            Some((key, value)) => QueryParam::new(key, value),
            None => QueryParam::key_only(segment),
        }
    }
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => f.write_str(&self.key),
        }
    }
}

impl PropertyKind for QueryParam {
    const KIND: &'static str = "QueryParam";

    fn key(&self) -> &str {
        &self.key
    }

    fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }

    fn from_descriptor(mut descriptor: PropertyDescriptor) -> Result<Self, ModelError> {
        let key = descriptor.require_key(Self::KIND)?;
        let value = match descriptor.value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => {
                return Err(ModelError::invalid_construction(
                    Self::KIND,
                    format!(
                        "query param '{}' value must be a string or null, got {}",
                        key,
                        json_type(&other)
                    ),
                ))
            }
        };
        Ok(Self {
            key,
            value,
            disabled: descriptor.disabled,
            description: descriptor.description,
            extra: descriptor.extra,
        })
    }

    fn to_descriptor(&self) -> PropertyDescriptor {
        PropertyDescriptor {
            key: Some(self.key.clone()),
            value: self.value.clone().map(Value::String).unwrap_or(Value::Null),
            disabled: self.disabled,
            description: self.description.clone(),
            extra: self.extra.clone(),
        }
    }

    fn replace_value(&mut self, other: Self) {
        self.value = other.value;
    }

    fn from_raw(raw: &str) -> Result<Vec<Self>, ModelError> {
        Ok(parse(raw))
    }
}

/// Split a query string into ordered parameters. A leading `?` is ignored and
/// so are empty segments. Repeated keys are all returned.
pub fn parse(query: &str) -> Vec<QueryParam> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|segment| {
            if segment.is_empty() {
                tracing::trace!("skipping empty query segment");
            }
            !segment.is_empty()
        })
        .map(QueryParam::parse_single)
        .collect()
}

/// Join enabled parameters back into a query string, without the `?`.
pub fn unparse<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = &'a QueryParam>,
{
    params
        .into_iter()
        .filter(|p| !p.is_disabled())
        .map(QueryParam::to_string)
        .collect::<Vec<_>>()
        .join("&")
}

/// Parameters to merge into a query: a raw query string or typed params.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    Raw(String),
    Params(Vec<QueryParam>),
}

impl From<&str> for QueryInput {
    fn from(raw: &str) -> Self {
        QueryInput::Raw(raw.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(raw: String) -> Self {
        QueryInput::Raw(raw)
    }
}

impl From<QueryParam> for QueryInput {
    fn from(param: QueryParam) -> Self {
        QueryInput::Params(vec![param])
    }
}

impl From<Vec<QueryParam>> for QueryInput {
    fn from(params: Vec<QueryParam>) -> Self {
        QueryInput::Params(params)
    }
}

impl QueryInput {
    pub fn into_params(self) -> Vec<QueryParam> {
        match self {
            QueryInput::Raw(raw) => parse(&raw),
            QueryInput::Params(params) => params,
        }
    }
}

/// One key or several keys to remove.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryKeys(pub Vec<String>);

impl From<&str> for QueryKeys {
    fn from(key: &str) -> Self {
        QueryKeys(vec![key.to_string()])
    }
}

impl From<String> for QueryKeys {
    fn from(key: String) -> Self {
        QueryKeys(vec![key])
    }
}

impl From<&[&str]> for QueryKeys {
    fn from(keys: &[&str]) -> Self {
        QueryKeys(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<S: Into<String>> From<Vec<S>> for QueryKeys {
    fn from(keys: Vec<S>) -> Self {
        QueryKeys(keys.into_iter().map(Into::into).collect())
    }
}

/// Merge parameters into `list`. A key already present keeps its position and
/// takes the new value.
pub fn add_query_params(list: &mut PropertyList<QueryParam>, input: impl Into<QueryInput>) {
    for param in input.into().into_params() {
        list.upsert_item(param);
    }
}

/// Remove every listed key from `list`; unknown keys are ignored.
pub fn remove_query_params(list: &mut PropertyList<QueryParam>, keys: impl Into<QueryKeys>) {
    for key in keys.into().0 {
        list.remove(&key);
    }
}
