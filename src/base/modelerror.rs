use thiserror::Error;

/// Errors surfaced by the model.
///
/// Absent or malformed optional input is not an error anywhere in the crate;
/// only programmer mistakes (a descriptor the member kind cannot represent)
/// and explicit conversions to wire types can fail.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid {kind} construction: {reason}")]
    InvalidConstruction { kind: &'static str, reason: String },

    #[error("Invalid URL '{raw}': {reason}")]
    InvalidUrl { raw: String, reason: String },

    #[error("Invalid header: {name}")]
    InvalidHeader { name: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Create an invalid construction error for the given member kind.
    pub fn invalid_construction(kind: &'static str, reason: impl Into<String>) -> Self {
        ModelError::InvalidConstruction {
            kind,
            reason: reason.into(),
        }
    }

    /// Create an invalid URL error.
    pub fn invalid_url(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::InvalidUrl {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(name: impl Into<String>) -> Self {
        ModelError::InvalidHeader { name: name.into() }
    }

    pub fn is_invalid_construction(&self) -> bool {
        matches!(self, ModelError::InvalidConstruction { .. })
    }
}
