//! Cloudinary outbound adapter.
//!
//! Implements [`MediaStorePort`] against the hosted REST API: signed multipart
//! uploads, admin resource lookups, and delivery-URL assembly. No retries; an
//! upstream failure is propagated with its HTTP status code.

mod sign;

use crate::domain::transformation::TransformationChain;
use crate::ports::media::{MediaAsset, MediaStoreError, MediaStorePort};
use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";
const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// All uploads for this service land in one configured folder; callers deal
/// in short public ids and the adapter applies the prefix.
#[derive(Clone)]
pub struct CloudinaryStore {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
    api_base: String,
    delivery_base: String,
}

impl CloudinaryStore {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        folder: impl Into<String>,
    ) -> Self {
        let folder = folder.into();
        Self {
            http: reqwest::Client::new(),
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            folder: folder.trim_matches('/').to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            delivery_base: DEFAULT_DELIVERY_BASE.to_string(),
        }
    }

    /// Point the API at a different host. Used by tests against a mock server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_delivery_base(mut self, delivery_base: impl Into<String>) -> Self {
        let delivery_base = delivery_base.into();
        self.delivery_base = delivery_base.trim_end_matches('/').to_string();
        self
    }

    async fn parse_asset(&self, response: reqwest::Response) -> Result<MediaAsset, MediaStoreError> {
        let status = response.status();
        if !status.is_success() {
            return Err(MediaStoreError::Upstream {
                http_code: status.as_u16(),
                message: upstream_message(response).await,
            });
        }
        Ok(response.json::<MediaAsset>().await?)
    }
}

#[async_trait]
impl MediaStorePort for CloudinaryStore {
    async fn upload<'a>(
        &self,
        local_path: &Path,
        public_id: Option<&'a str>,
    ) -> Result<MediaAsset, MediaStoreError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string();

        let mut signed_params = vec![
            ("folder", self.folder.clone()),
            ("timestamp", timestamp.clone()),
        ];
        if let Some(id) = public_id {
            signed_params.push(("public_id", id.to_string()));
        }
        let signature = sign::api_sign_request(&signed_params, &self.api_secret);

        let file_name = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        let body = tokio::fs::read(local_path).await?;

        debug!(file = %file_name, bytes = body.len(), "uploading to media service");

        let mut form = multipart::Form::new()
            .part("file", multipart::Part::bytes(body).file_name(file_name))
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("folder", self.folder.clone());
        if let Some(id) = public_id {
            form = form.text("public_id", id.to_string());
        }

        let url = format!("{}/v1_1/{}/image/upload", self.api_base, self.cloud_name);
        let response = self.http.post(&url).multipart(form).send().await?;
        self.parse_asset(response).await
    }

    async fn resource(&self, public_id: &str) -> Result<MediaAsset, MediaStoreError> {
        let url = format!(
            "{}/v1_1/{}/resources/image/upload/{}/{}",
            self.api_base, self.cloud_name, self.folder, public_id
        );
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await?;
        self.parse_asset(response).await
    }

    fn delivery_url(&self, public_id: &str, chain: &TransformationChain) -> String {
        let mut url = format!("{}/{}/image/upload", self.delivery_base, self.cloud_name);
        if !chain.is_empty() {
            url.push('/');
            url.push_str(&chain.to_url_path());
        }
        url.push('/');
        url.push_str(&self.folder);
        url.push('/');
        url.push_str(public_id);
        url
    }
}

/// Pull the human-readable message out of an error payload, falling back to
/// the raw body.
async fn upstream_message(response: reqwest::Response) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error.message,
        Err(_) => text,
    }
}
