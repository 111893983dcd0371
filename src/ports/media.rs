use crate::domain::transformation::TransformationChain;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// A resource descriptor as returned by the media service. We keep the fields
/// the client cares about and ignore the rest of the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub public_id: String,
    pub secure_url: String,
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Error, Debug)]
pub enum MediaStoreError {
    #[error("request to media service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("media service returned {http_code}: {message}")]
    Upstream { http_code: u16, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl MediaStoreError {
    /// The upstream HTTP status code, when the service sent one.
    pub fn http_code(&self) -> Option<u16> {
        match self {
            MediaStoreError::Upstream { http_code, .. } => Some(*http_code),
            _ => None,
        }
    }
}

/// Outbound port to the hosted media service.
///
/// `public_id` arguments are short ids; folder placement is an adapter
/// concern, so returned [`MediaAsset::public_id`]s may carry a folder prefix.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStorePort: Send + Sync {
    /// Upload a local file. When `public_id` is `None` the service assigns one.
    async fn upload<'a>(
        &self,
        local_path: &Path,
        public_id: Option<&'a str>,
    ) -> Result<MediaAsset, MediaStoreError>;

    /// Look up an existing resource by short public id.
    async fn resource(&self, public_id: &str) -> Result<MediaAsset, MediaStoreError>;

    /// Direct delivery URL for a resource with a transformation chain applied.
    fn delivery_url(&self, public_id: &str, chain: &TransformationChain) -> String;
}
