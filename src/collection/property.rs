//! Single name/value records and the descriptor form they round-trip through.

use crate::base::modelerror::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Plain-data form of a property: `{ key, value, disabled?, description? }`
/// plus any unknown fields, which are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PropertyDescriptor {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Set the disabled flag.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an extra pass-through field.
    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Read a descriptor out of a JSON object on behalf of `kind`.
    pub fn from_value(value: Value, kind: &'static str) -> Result<Self, ModelError> {
        if !value.is_object() {
            return Err(ModelError::invalid_construction(
                kind,
                format!("expected an object descriptor, got {}", json_type(&value)),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| ModelError::invalid_construction(kind, e.to_string()))
    }

    /// Overlay `patch` onto this descriptor. The key is kept, the value is
    /// always overwritten, optional fields only when the patch carries them.
    pub fn merge(&mut self, patch: PropertyDescriptor) {
        self.value = patch.value;
        if patch.disabled.is_some() {
            self.disabled = patch.disabled;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        self.extra.extend(patch.extra);
    }

    pub(crate) fn require_key(&mut self, kind: &'static str) -> Result<String, ModelError> {
        self.key
            .take()
            .ok_or_else(|| ModelError::invalid_construction(kind, "descriptor has no key"))
    }

    /// Render as a JSON object. Known fields first, then extras.
    pub fn into_value(self) -> Value {
        let mut object = Map::new();
        if let Some(key) = self.key {
            object.insert("key".to_string(), Value::String(key));
        }
        object.insert("value".to_string(), self.value);
        if let Some(disabled) = self.disabled {
            object.insert("disabled".to_string(), Value::Bool(disabled));
        }
        if let Some(description) = self.description {
            object.insert("description".to_string(), Value::String(description));
        }
        for (name, value) in self.extra {
            object.entry(name).or_insert(value);
        }
        Value::Object(object)
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A member kind a [`PropertyList`](crate::collection::PropertyList) can hold.
///
/// The associated constants are the per-kind index policy.
pub trait PropertyKind: Clone + fmt::Debug {
    /// Name used in errors and logs.
    const KIND: &'static str;

    /// Fold keys to lowercase before indexing.
    const INDEX_CASE_INSENSITIVE: bool = false;

    fn key(&self) -> &str;

    fn is_disabled(&self) -> bool;

    fn from_descriptor(descriptor: PropertyDescriptor) -> Result<Self, ModelError>;

    fn to_descriptor(&self) -> PropertyDescriptor;

    /// Take only the value of `other`, leaving every other field as is.
    fn replace_value(&mut self, other: Self);

    /// Build members from the kind's raw string grammar, if it has one.
    fn from_raw(_raw: &str) -> Result<Vec<Self>, ModelError> {
        Err(ModelError::invalid_construction(
            Self::KIND,
            "raw string input is not supported",
        ))
    }

    /// Apply a partial descriptor. On error the member is left unchanged.
    fn update(&mut self, patch: PropertyDescriptor) -> Result<(), ModelError> {
        let mut merged = self.to_descriptor();
        merged.merge(patch);
        *self = Self::from_descriptor(merged)?;
        Ok(())
    }
}

/// Generic property holding an arbitrary JSON value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Value,
    /// `None` when the input carried no `disabled` field.
    pub disabled: Option<bool>,
    pub description: Option<String>,
    pub extra: Map<String, Value>,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }
}

impl PropertyKind for Property {
    const KIND: &'static str = "Property";

    fn key(&self) -> &str {
        &self.key
    }

    fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }

    fn from_descriptor(mut descriptor: PropertyDescriptor) -> Result<Self, ModelError> {
        let key = descriptor.require_key(Self::KIND)?;
        Ok(Self {
            key,
            value: descriptor.value,
            disabled: descriptor.disabled,
            description: descriptor.description,
            extra: descriptor.extra,
        })
    }

    fn to_descriptor(&self) -> PropertyDescriptor {
        PropertyDescriptor {
            key: Some(self.key.clone()),
            value: self.value.clone(),
            disabled: self.disabled,
            description: self.description.clone(),
            extra: self.extra.clone(),
        }
    }

    fn replace_value(&mut self, other: Self) {
        self.value = other.value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_keeps_unknown_fields() {
        let raw = json!({ "key": "a", "value": 1, "type": "text", "_id": "x1" });
        let descriptor = PropertyDescriptor::from_value(raw.clone(), "Property").unwrap();
        assert_eq!(descriptor.extra.len(), 2);
        assert_eq!(descriptor.into_value(), raw);
    }

    #[test]
    fn test_descriptor_rejects_non_object() {
        let err = PropertyDescriptor::from_value(json!(42), "Property").unwrap_err();
        assert!(err.is_invalid_construction());
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_descriptor_rejects_wrong_field_type() {
        let err = PropertyDescriptor::from_value(json!({ "key": "a", "disabled": "yes" }), "Property")
            .unwrap_err();
        assert!(err.is_invalid_construction());
    }

    #[test]
    fn test_merge_overwrites_value_only_when_fields_absent() {
        let mut base = PropertyDescriptor::new("a", "1")
            .disabled(true)
            .description("first");
        base.merge(PropertyDescriptor::new("a", "2"));

        assert_eq!(base.value, json!("2"));
        assert_eq!(base.disabled, Some(true));
        assert_eq!(base.description.as_deref(), Some("first"));
    }

    #[test]
    fn test_property_requires_key() {
        let err = Property::from_descriptor(PropertyDescriptor::default()).unwrap_err();
        assert!(err.is_invalid_construction());
    }

    #[test]
    fn test_property_descriptor_omits_absent_disabled() {
        let descriptor = Property::new("a", json!([1, 2])).to_descriptor();
        assert_eq!(descriptor.into_value(), json!({ "key": "a", "value": [1, 2] }));
    }

    #[test]
    fn test_explicit_false_disabled_round_trips() {
        let raw = json!({ "key": "a", "value": "1", "disabled": false });
        let descriptor = PropertyDescriptor::from_value(raw.clone(), "Property").unwrap();
        let property = Property::from_descriptor(descriptor).unwrap();

        assert!(!property.is_disabled());
        assert_eq!(property.to_descriptor().into_value(), raw);
    }

    #[test]
    fn test_update_keeps_member_key() {
        let mut property = Property::new("a", "1");
        property.update(PropertyDescriptor::new("ignored", "2")).unwrap();
        assert_eq!(property.key, "a");
        assert_eq!(property.value, json!("2"));
    }

    #[test]
    fn test_raw_input_unsupported_for_generic_kind() {
        let err = Property::from_raw("a=1").unwrap_err();
        assert!(err.is_invalid_construction());
    }
}
