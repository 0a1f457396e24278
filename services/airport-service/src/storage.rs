use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{config::Credentials, config::Region, presigning::PresigningConfig, Client};
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

use airport_common::env_opt;

pub const BUCKET: &str = "my-unique-bucket-name";
pub const REGION: &str = "us-west-2";
pub const PRESIGN_TTL: Duration = Duration::from_secs(15 * 60);
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

const KEY_EXTENSION: &str = ".jpg";
const MAX_NAME_BYTES: usize = 1000;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage credentials unavailable: {0}")]
    AuthConfig(String),
    #[error("presign failed: {0}")]
    Presign(String),
    #[error("upload failed: {0}")]
    Upload(String),
}

#[derive(Debug, PartialEq, Eq, Error)]
#[error("name cannot be used as a storage key: {0}")]
pub struct InvalidKey(pub &'static str);

/// Provider contract consumed by the image update workflow.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn resolve_credentials(&self) -> Result<Credentials, StorageError>;

    /// Write-capable URL for `key`, valid for `ttl`.
    async fn presign_put(
        &self,
        credentials: Credentials,
        key: &str,
        ttl: Duration,
    ) -> Result<String, StorageError>;

    fn public_url(&self, key: &str) -> String;
}

/// Bucket and region are fixed; only the key pair comes from the environment.
#[derive(Clone)]
pub struct StorageConfig {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub bucket: String,
    pub region: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            access_key: env_opt("AWS_ACCESS_KEY_ID"),
            secret_key: env_opt("AWS_SECRET_ACCESS_KEY"),
            bucket: BUCKET.to_string(),
            region: REGION.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct S3Storage {
    shared: aws_config::SdkConfig,
    config: StorageConfig,
}

impl S3Storage {
    pub async fn new(config: StorageConfig) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .no_credentials()
            .load()
            .await;
        Self { shared, config }
    }

    fn client(&self, credentials: Credentials) -> Client {
        let s3_config = aws_sdk_s3::config::Builder::from(&self.shared)
            .credentials_provider(credentials)
            .build();
        Client::from_conf(s3_config)
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    async fn resolve_credentials(&self) -> Result<Credentials, StorageError> {
        let access_key = self
            .config
            .access_key
            .as_deref()
            .ok_or_else(|| StorageError::AuthConfig("AWS_ACCESS_KEY_ID is not set".to_string()))?;
        let secret_key = self.config.secret_key.as_deref().ok_or_else(|| {
            StorageError::AuthConfig("AWS_SECRET_ACCESS_KEY is not set".to_string())
        })?;
        Ok(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "airport-service",
        ))
    }

    async fn presign_put(
        &self,
        credentials: Credentials,
        key: &str,
        ttl: Duration,
    ) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|err| StorageError::Presign(format!("presign config: {err}")))?;
        let presigned = self
            .client(credentials)
            .put_object()
            .bucket(self.config.bucket.as_str())
            .key(key)
            .content_type(IMAGE_CONTENT_TYPE)
            .presigned(presigning)
            .await
            .map_err(|err| StorageError::Presign(err.to_string()))?;
        Ok(presigned.uri().to_string())
    }

    fn public_url(&self, key: &str) -> String {
        public_url(&self.config.bucket, key)
    }
}

/// Storage key for an airport image: `<name>.jpg`.
///
/// The name comes straight from the request, so anything that would change
/// the key's path structure or carry control bytes is refused.
pub fn object_key(name: &str) -> Result<String, InvalidKey> {
    if name.trim().is_empty() {
        return Err(InvalidKey("name is blank"));
    }
    if name.len() > MAX_NAME_BYTES {
        return Err(InvalidKey("name is too long"));
    }
    if name == "." || name == ".." {
        return Err(InvalidKey("name is a relative path"));
    }
    if name.contains(['/', '\\']) {
        return Err(InvalidKey("name contains a path separator"));
    }
    if name.chars().any(char::is_control) {
        return Err(InvalidKey("name contains control characters"));
    }
    Ok(format!("{name}{KEY_EXTENSION}"))
}

/// Public object URL with the key encoded as one path segment.
pub fn public_url(bucket: &str, key: &str) -> String {
    let base = format!("https://{bucket}.s3.amazonaws.com/");
    let Ok(mut url) = Url::parse(&base) else {
        return format!("{base}{key}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(key);
    }
    url.to_string()
}

/// PUT the raw image bytes to a presigned URL; anything but 2xx is a failure.
pub async fn upload_presigned(
    http: &reqwest::Client,
    url: &str,
    body: Vec<u8>,
) -> Result<(), StorageError> {
    let response = http
        .put(url)
        .header(reqwest::header::CONTENT_TYPE, IMAGE_CONTENT_TYPE)
        .body(body)
        .send()
        .await
        .map_err(|err| StorageError::Upload(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(StorageError::Upload(format!("storage returned {status}")));
    }
    Ok(())
}
