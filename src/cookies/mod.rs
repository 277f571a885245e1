//! Cookies and the `Set-Cookie` string grammar.
//!
//! - [`cookieparser`]: stateless parser from a raw cookie string to
//!   [`CookieAttributes`](cookieparser::CookieAttributes)
//! - [`Cookie`](cookie::Cookie): the cookie object, built from a descriptor or
//!   a raw string, with a JSON mirror of its input
//!
//! # Example
//!
//! ```rust
//! use apimodel::cookies::cookie::Cookie;
//!
//! let parsed = Cookie::parse("GAPS=lol; Path=/; Secure; Priority=HIGH");
//! assert_eq!(parsed.key.as_deref(), Some("GAPS"));
//! assert!(parsed.secure);
//! assert_eq!(parsed.extensions[0].key, "Priority");
//! ```
//!
//! Jar semantics (expiry eviction, domain matching) are not modeled.

pub mod cookie;
pub mod cookieparser;

pub use cookie::{Cookie, CookieDescriptor};
pub use cookieparser::{CookieAttributes, CookieExtension};
