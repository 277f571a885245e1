//! Request-level types.
//!
//! - [`Header`](header::Header) and [`QueryParam`](querystring::QueryParam):
//!   list member kinds with their own raw grammars
//! - [`querystring`]: the query-string codec
//! - [`RequestUrl`](requesturl::RequestUrl) and [`Request`](request::Request):
//!   wrappers that own the lists and forward mutations to them

pub mod header;
pub mod querystring;
pub mod request;
pub mod requesturl;

// Re-exports for convenience
pub use header::{Header, HeaderFilter};
pub use querystring::{QueryInput, QueryKeys, QueryParam};
pub use request::{Request, RequestBuilder};
pub use requesturl::RequestUrl;
