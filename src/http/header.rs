//! Request headers as list members.
//!
//! Headers are indexed by their exact key, like every other property.
//! Raw header blocks (`Name: value` per line) are accepted wherever a header
//! list is built from JSON.

use crate::base::modelerror::ModelError;
use crate::collection::property::{json_type, PropertyDescriptor, PropertyKind};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub key: String,
    pub value: String,
    /// `None` when the input carried no `disabled` field.
    pub disabled: Option<bool>,
    pub description: Option<String>,
    pub extra: Map<String, Value>,
}

/// Options for [`Request::get_headers`](crate::http::request::Request::get_headers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderFilter {
    /// Skip disabled headers.
    pub enabled: bool,
    /// Lowercase header names in the result.
    pub ignore_case: bool,
}

impl HeaderFilter {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ignore_case: false,
        }
    }
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Parse one `Name: value` line. Blank lines yield `None`; a line without
    /// a colon becomes a header with an empty value.
    pub fn parse_single(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(match line.split_once(':') {
            Some((key, value)) => Header::new(key.trim(), value.trim()),
            None => Header::new(line, ""),
        })
    }

    /// Parse a block of header lines separated by `\n` or `\r\n`.
    pub fn parse(raw: &str) -> Vec<Self> {
        raw.lines().filter_map(Header::parse_single).collect()
    }

    /// Render enabled headers as `Name: value` lines joined by `separator`.
    pub fn unparse<'a, I>(headers: I, separator: &str) -> String
    where
        I: IntoIterator<Item = &'a Header>,
    {
        headers
            .into_iter()
            .filter(|h| !h.is_disabled())
            .map(Header::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

impl PropertyKind for Header {
    const KIND: &'static str = "Header";

    fn key(&self) -> &str {
        &self.key
    }

    fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }

    /// A missing or `null` value is an empty header. Anything other than a
    /// string is rejected rather than stringified.
    fn from_descriptor(mut descriptor: PropertyDescriptor) -> Result<Self, ModelError> {
        let key = descriptor.require_key(Self::KIND)?;
        let value = match descriptor.value {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => {
                return Err(ModelError::invalid_construction(
                    Self::KIND,
                    format!("header '{}' value must be a string, got {}", key, json_type(&other)),
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
            value: Value::String(self.value.clone()),
            disabled: self.disabled,
            description: self.description.clone(),
            extra: self.extra.clone(),
        }
    }

    fn replace_value(&mut self, other: Self) {
        self.value = other.value;
    }

    fn from_raw(raw: &str) -> Result<Vec<Self>, ModelError> {
        Ok(Header::parse(raw))
    }
}
