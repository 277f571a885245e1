//! # apimodel
//!
//! An in-memory object model for API request artifacts.
//!
//! `apimodel` builds requests, URLs, headers, query parameters and cookies
//! from plain JSON data, lets callers mutate them through a stable API, and
//! renders them back to an equivalent plain-data form. Unknown fields are
//! carried through untouched.
//!
//! ## Quick Start
//!
//! ```rust
//! use apimodel::http::{HeaderFilter, QueryParam, Request};
//! use serde_json::json;
//!
//! let mut request = Request::from_value(json!({
//!     "url": "https://postman-echo.com/get",
//!     "method": "GET",
//!     "header": [
//!         { "key": "some", "value": "header" },
//!         { "key": "other", "value": "otherheader", "disabled": true }
//!     ]
//! }))?;
//!
//! request.add_query_params(vec![QueryParam::new("a", "1"), QueryParam::new("b", "2")]);
//! request.remove_query_params("a");
//!
//! assert_eq!(request.url.to_string(), "https://postman-echo.com/get?b=2");
//! assert_eq!(request.get_headers(HeaderFilter::enabled()).len(), 1);
//! # Ok::<(), apimodel::base::ModelError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`collection`] - Ordered, key-unique property lists
//! - [`cookies`] - Cookie objects and the `Set-Cookie` grammar
//! - [`http`] - Headers, query strings, URLs and requests
//!
//! ## Threading
//!
//! Every operation is synchronous and performs no I/O. Nothing is internally
//! locked; share mutable state across threads only behind your own lock.

pub mod base;
pub mod collection;
pub mod cookies;
pub mod http;
