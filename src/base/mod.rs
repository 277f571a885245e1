//! Base types and error handling.
//!
//! - [`ModelError`](modelerror::ModelError): the crate-wide error type

pub mod modelerror;

pub use modelerror::ModelError;
