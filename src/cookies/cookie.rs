use crate::base::modelerror::ModelError;
use crate::collection::property::json_type;
use crate::cookies::cookieparser::{self, CookieAttributes, CookieExtension};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::{format_description, OffsetDateTime, PrimitiveDateTime};

/// Date layouts seen in `Expires` attributes, all in GMT.
const COOKIE_DATE_FORMATS: [&str; 2] = [
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT",
    "[weekday repr:short], [day]-[month repr:short]-[year] [hour]:[minute]:[second] GMT",
];

/// Plain-data form of a cookie.
///
/// `key` is accepted as an alias of `name`; `expires` and `maxAge` may be
/// numbers and are normalized to strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieDescriptor {
    #[serde(default, alias = "key", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<CookieExtension>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or a number, got {}",
            json_type(&other)
        ))),
    }
}

/// A cookie as carried by a response or a cookie jar export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub expires: Option<String>,
    pub max_age: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub session: bool,
    pub extensions: Vec<CookieExtension>,
    pub extra: Map<String, Value>,
}

impl Cookie {
    /// A session cookie with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            session: true,
            ..Default::default()
        }
    }

    /// Parse a raw `Set-Cookie` string. Never fails.
    pub fn parse(raw: &str) -> CookieAttributes {
        cookieparser::parse(raw)
    }

    /// Build from a raw `Set-Cookie` string.
    pub fn from_header(raw: &str) -> Self {
        Self::from_attributes(cookieparser::parse(raw))
    }

    pub fn from_attributes(attributes: CookieAttributes) -> Self {
        Self {
            name: attributes.key.unwrap_or_default(),
            value: attributes.value.unwrap_or_default(),
            expires: attributes.expires,
            max_age: attributes.max_age,
            domain: attributes.domain,
            path: attributes.path,
            secure: attributes.secure,
            http_only: attributes.http_only,
            host_only: attributes.host_only,
            session: attributes.session,
            extensions: attributes.extensions,
            extra: Map::new(),
        }
    }

    /// `session` is taken from the descriptor when given, otherwise derived
    /// from the absence of `expires` and `maxAge`.
    pub fn from_descriptor(descriptor: CookieDescriptor) -> Self {
        let session = descriptor
            .session
            .unwrap_or(descriptor.expires.is_none() && descriptor.max_age.is_none());
        Self {
            name: descriptor.name.unwrap_or_default(),
            value: descriptor.value.unwrap_or_default(),
            expires: descriptor.expires,
            max_age: descriptor.max_age,
            domain: descriptor.domain,
            path: descriptor.path,
            secure: descriptor.secure.unwrap_or(false),
            http_only: descriptor.http_only.unwrap_or(false),
            host_only: descriptor.host_only.unwrap_or(false),
            session,
            extensions: descriptor.extensions,
            extra: descriptor.extra,
        }
    }

    /// Build from JSON: an object descriptor or a raw cookie string.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::String(raw) => Ok(Self::from_header(&raw)),
            Value::Object(_) => serde_json::from_value(value)
                .map(Self::from_descriptor)
                .map_err(|e| ModelError::invalid_construction("Cookie", e.to_string())),
            other => Err(ModelError::invalid_construction(
                "Cookie",
                format!("expected an object or a string, got {}", json_type(&other)),
            )),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn to_descriptor(&self) -> CookieDescriptor {
        CookieDescriptor {
            name: Some(self.name.clone()),
            value: Some(self.value.clone()),
            expires: self.expires.clone(),
            max_age: self.max_age.clone(),
            domain: self.domain.clone(),
            path: self.path.clone(),
            secure: Some(self.secure),
            http_only: Some(self.http_only),
            host_only: Some(self.host_only),
            session: Some(self.session),
            extensions: self.extensions.clone(),
            extra: self.extra.clone(),
        }
    }

    pub fn to_json(&self) -> Result<Value, ModelError> {
        Ok(serde_json::to_value(self.to_descriptor())?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cookie's value, what the cookie "is" when used as a scalar.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// `expires` read as a point in time. Accepts the cookie date layouts,
    /// RFC 3339 and unix seconds; anything else is `None`.
    pub fn expiration_time(&self) -> Option<OffsetDateTime> {
        self.expires.as_deref().and_then(parse_cookie_date)
    }

    /// True when `expires` is known and earlier than `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expiration_time().is_some_and(|expiry| expiry < now)
    }
}

fn parse_cookie_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<i64>() {
        return OffsetDateTime::from_unix_timestamp(secs).ok();
    }
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    COOKIE_DATE_FORMATS.iter().find_map(|layout| {
        let description = format_description::parse(layout).ok()?;
        PrimitiveDateTime::parse(raw, &description)
            .ok()
            .map(PrimitiveDateTime::assume_utc)
    })
}

/// Renders the cookie as a `Set-Cookie` header value.
impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(expires) = &self.expires {
            write!(f, "; Expires={}", expires)?;
        }
        if let Some(max_age) = &self.max_age {
            write!(f, "; Max-Age={}", max_age)?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={}", domain)?;
        }
        if let Some(path) = &self.path {
            write!(f, "; Path={}", path)?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        for extension in &self.extensions {
            if extension.value.is_empty() {
                write!(f, "; {}", extension.key)?;
            } else {
                write!(f, "; {}={}", extension.key, extension.value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::Month;

    fn stored_cookie() -> Value {
        json!({
            "domain": ".httpbin.org",
            "expires": 1502442248,
            "hostOnly": false,
            "httpOnly": false,
            "key": "_ga",
            "path": "/",
            "secure": false,
            "session": false,
            "_postman_storeId": "0",
            "value": "GA1.2.113558537.1435817423"
        })
    }

    #[test]
    fn test_from_value_accepts_key_alias_and_numeric_expiry() {
        let cookie = Cookie::from_value(stored_cookie()).unwrap();
        assert_eq!(cookie.name(), "_ga");
        assert_eq!(cookie.expires.as_deref(), Some("1502442248"));
        assert_eq!(cookie.extra["_postman_storeId"], json!("0"));
    }

    #[test]
    fn test_to_json_mirrors_input() {
        let raw = stored_cookie();
        let json = Cookie::from_value(raw.clone()).unwrap().to_json().unwrap();

        assert_eq!(json["name"], raw["key"]);
        assert_eq!(json["value"], raw["value"]);
        assert_eq!(json["domain"], raw["domain"]);
        assert_eq!(json["path"], raw["path"]);
        assert_eq!(json["expires"], json!("1502442248"));
        assert_eq!(json["hostOnly"], raw["hostOnly"]);
        assert_eq!(json["httpOnly"], raw["httpOnly"]);
        assert_eq!(json["secure"], raw["secure"]);
        assert_eq!(json["session"], raw["session"]);
        assert_eq!(json["_postman_storeId"], raw["_postman_storeId"]);
    }

    #[test]
    fn test_to_json_is_an_object() {
        let json = Cookie::from_header("GAPS=lol; Path=/; Priority=HIGH").to_json().unwrap();
        assert_eq!(json["name"], json!("GAPS"));
        assert_eq!(json["extensions"], json!([{ "key": "Priority", "value": "HIGH" }]));
    }

    #[test]
    fn test_value_accessor() {
        let cookie = Cookie::from_value(json!({ "name": "blah", "value": "this is a cookie value" }))
            .unwrap();
        assert_eq!(cookie.value(), "this is a cookie value");
        assert!(cookie.session);
    }

    #[test]
    fn test_from_value_rejects_bad_shapes() {
        assert!(Cookie::from_value(json!(12)).unwrap_err().is_invalid_construction());
        assert!(Cookie::from_value(json!({ "name": "a", "expires": true }))
            .unwrap_err()
            .is_invalid_construction());
    }

    #[test]
    fn test_from_value_string_is_parsed() {
        let cookie = Cookie::from_value(json!("sid=1; Max-Age=60")).unwrap();
        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.max_age.as_deref(), Some("60"));
        assert!(!cookie.session);
    }

    #[test]
    fn test_expiration_time_layouts() {
        let dashed = Cookie::from_header("a=b; Expires=Sun, 04-Feb-2018 14:18:27 GMT");
        let expiry = dashed.expiration_time().unwrap();
        assert_eq!(expiry.year(), 2018);
        assert_eq!(expiry.month(), Month::February);
        assert_eq!(expiry.day(), 4);
        assert_eq!(expiry.hour(), 14);

        let imf = Cookie::from_header("a=b; Expires=Sun, 04 Feb 2018 14:18:27 GMT");
        assert_eq!(imf.expiration_time(), Some(expiry));

        let unix = Cookie::from_value(stored_cookie()).unwrap();
        assert_eq!(unix.expiration_time().unwrap().unix_timestamp(), 1502442248);

        let unparsable = Cookie::from_header("a=b; Expires=whenever");
        assert!(unparsable.expiration_time().is_none());
        assert!(!unparsable.is_expired(OffsetDateTime::now_utc()));
    }

    #[test]
    fn test_is_expired() {
        let cookie = Cookie::from_header("a=b; Expires=Sun, 04-Feb-2018 14:18:27 GMT");
        assert!(cookie.is_expired(OffsetDateTime::now_utc()));
        assert!(!Cookie::new("a", "b").is_expired(OffsetDateTime::now_utc()));
    }

    #[test]
    fn test_display_renders_set_cookie() {
        let raw = "GAPS=lol; Expires=Sun, 04-Feb-2018 14:18:27 GMT; Path=/; Secure; HttpOnly; Priority=HIGH";
        assert_eq!(Cookie::from_header(raw).to_string(), raw);
        assert_eq!(Cookie::new("a", "b").to_string(), "a=b");
    }
}
