//! `Set-Cookie` string grammar.
//!
//! A cookie string is a `;` separated token list. The first token is
//! `name=value` (only the first `=` splits, so values may contain `=`). Every
//! other token is either one of the recognized attributes, matched without
//! regard to case, or an extension kept in encounter order. The parser never
//! fails: tokens it cannot make sense of are dropped.

use serde::{Deserialize, Serialize};

/// An attribute token that is not one of the recognized attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieExtension {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl CookieExtension {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Everything the cookie grammar encodes.
///
/// `host_only` is not part of the wire grammar and is always `false` here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieAttributes {
    pub key: Option<String>,
    pub value: Option<String>,
    pub expires: Option<String>,
    pub max_age: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    /// True iff neither `Expires` nor `Max-Age` was present.
    pub session: bool,
    pub extensions: Vec<CookieExtension>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Domain,
    Path,
    Expires,
    MaxAge,
    Secure,
    HttpOnly,
}

impl Attribute {
    fn recognize(name: &str) -> Option<Self> {
        const NAMES: [(&str, Attribute); 6] = [
            ("domain", Attribute::Domain),
            ("path", Attribute::Path),
            ("expires", Attribute::Expires),
            ("max-age", Attribute::MaxAge),
            ("secure", Attribute::Secure),
            ("httponly", Attribute::HttpOnly),
        ];
        NAMES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, attribute)| *attribute)
    }
}

/// Split on the first `=`, trimming both sides.
fn split_pair(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (token.trim(), None),
    }
}

/// Parse a raw cookie string.
///
/// Empty input yields empty attributes with every flag `false`.
pub fn parse(raw: &str) -> CookieAttributes {
    let mut attributes = CookieAttributes::default();
    if raw.trim().is_empty() {
        return attributes;
    }

    let mut tokens = raw.split(';');

    if let Some(first) = tokens.next() {
        let first = first.trim();
        if first.is_empty() {
            tracing::trace!("cookie string has no name=value pair");
        } else {
            let (name, value) = split_pair(first);
            attributes.key = Some(name.to_string());
            attributes.value = value.map(str::to_string);
        }
    }

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (name, value) = split_pair(token);
        if name.is_empty() {
            tracing::trace!(token, "ignoring cookie token without a name");
            continue;
        }

        let Some(attribute) = Attribute::recognize(name) else {
            attributes
                .extensions
                .push(CookieExtension::new(name, value.unwrap_or_default()));
            continue;
        };

        let slot = match attribute {
            Attribute::Secure => {
                attributes.secure = true;
                continue;
            }
            Attribute::HttpOnly => {
                attributes.http_only = true;
                continue;
            }
            Attribute::Domain => &mut attributes.domain,
            Attribute::Path => &mut attributes.path,
            Attribute::Expires => &mut attributes.expires,
            Attribute::MaxAge => &mut attributes.max_age,
        };
        match value.filter(|v| !v.is_empty()) {
            Some(value) => *slot = Some(value.to_string()),
            None => tracing::trace!(attribute = name, "ignoring cookie attribute without a value"),
        }
    }

    attributes.session = attributes.expires.is_none() && attributes.max_age.is_none();
    attributes
}
