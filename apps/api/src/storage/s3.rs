use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use bytes::Bytes;
use tracing::{debug, info};

use crate::config::S3Settings;
use crate::storage::{Locator, ObjectStore, StorageError};

/// Constructs an S3 client configured for MinIO (custom endpoint) or AWS.
pub async fn build_s3_client(settings: &S3Settings) -> aws_sdk_s3::Client {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(settings.region.clone()));

    if let (Some(access_key), Some(secret_key)) = (&settings.access_key, &settings.secret_key) {
        loader = loader.credentials_provider(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "sortinghat-static",
        ));
    }

    if let Some(endpoint) = &settings.endpoint {
        info!("Using S3 endpoint {endpoint}");
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(settings.force_path_style)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

/// `ObjectStore` backed by S3 `GetObject`.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn fetch(&self, locator: &Locator) -> Result<Bytes, StorageError> {
        debug!(bucket = %locator.bucket, key = %locator.key, "Downloading object");

        let output = self
            .client
            .get_object()
            .bucket(&locator.bucket)
            .key(&locator.key)
            .send()
            .await
            .map_err(|e| StorageError::Retrieval {
                locator: locator.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Retrieval {
                locator: locator.to_string(),
                reason: format!("body read failed: {e}"),
            })?
            .into_bytes();

        debug!(size = data.len(), "Downloaded {locator}");
        Ok(data)
    }
}
