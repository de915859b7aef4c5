//! Compact text form of a [`DisplayModel`] for the persisted-state store

use crate::model::DisplayModel;

/// Persisted bytes could not be turned back into a model.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Not UTF-8
    #[error("persisted model is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Not a serialized model
    #[error("persisted model is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

impl DisplayModel {
    /// Single-line JSON
    pub fn to_text(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Inverse of [`DisplayModel::to_text`]
    pub fn from_text(text: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Decode raw stored bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::from_text(std::str::from_utf8(bytes)?)
    }
}
