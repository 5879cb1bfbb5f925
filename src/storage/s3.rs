use std::time::Duration;

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::SdkConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, Config};
use bytes::Bytes;
use serde::Deserialize;
use tokio::sync::OnceCell;

use super::{ObjectStorage, SignOperation};
use crate::core::{ReportError, ReportResult};
use crate::models::{StorageCredentials, StorageObject};

const DEFAULT_REGION: &str = "us-east-1";

/// The fields S3 understands inside the opaque credentials blob.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct S3Credentials {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    session_token: Option<String>,
    region: Option<String>,
    /// S3 compatible endpoint (R2, MinIO, ...).
    endpoint: Option<String>,
}

impl S3Credentials {
    fn parse(credentials: &StorageCredentials) -> ReportResult<Self> {
        match credentials.as_value() {
            serde_json::Value::Null => Ok(Self::default()),
            value => serde_json::from_value(value.clone())
                .map_err(|e| ReportError::Storage(format!("Invalid S3 credentials: {}", e))),
        }
    }
}

/// [`ObjectStorage`] on Amazon S3 or an S3 compatible service.
///
/// Each object carries its own credentials. When they hold no access key the
/// ambient AWS provider chain is used instead.
#[derive(Default)]
pub struct S3Storage {
    ambient: OnceCell<SdkConfig>,
}

impl S3Storage {
    pub fn new() -> Self {
        Self::default()
    }

    async fn ambient_config(&self) -> &SdkConfig {
        self.ambient
            .get_or_init(|| async {
                let region_provider = RegionProviderChain::default_provider().or_else(DEFAULT_REGION);
                aws_config::defaults(BehaviorVersion::latest())
                    .region(region_provider)
                    .load()
                    .await
            })
            .await
    }

    async fn client(&self, credentials: &StorageCredentials) -> ReportResult<Client> {
        let credentials = S3Credentials::parse(credentials)?;

        let mut builder = match (&credentials.access_key_id, &credentials.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .region(Region::new(DEFAULT_REGION))
                .credentials_provider(Credentials::new(
                    access_key_id.clone(),
                    secret_access_key.clone(),
                    credentials.session_token.clone(),
                    None,
                    "pdf-reports",
                )),
            _ => aws_sdk_s3::config::Builder::from(self.ambient_config().await),
        };

        if let Some(region) = credentials.region {
            builder = builder.region(Region::new(region));
        }
        if let Some(endpoint) = credentials.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn sign(
        &self,
        operation: SignOperation,
        object: &StorageObject,
        expires_in: Duration,
    ) -> ReportResult<String> {
        let client = self.client(&object.credentials).await?;
        let presigning_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| ReportError::Storage(e.to_string()))?;

        tracing::debug!(
            "Signing {:?} URL for s3://{}/{} ({}s)",
            operation,
            object.bucket,
            object.path,
            expires_in.as_secs()
        );

        let presigned = match operation {
            SignOperation::Get => client
                .get_object()
                .bucket(&object.bucket)
                .key(&object.path)
                .presigned(presigning_config)
                .await
                .map_err(|e| ReportError::Storage(DisplayErrorContext(e).to_string()))?,
            SignOperation::Put => client
                .put_object()
                .bucket(&object.bucket)
                .key(&object.path)
                .content_type(super::PDF_CONTENT_TYPE)
                .presigned(presigning_config)
                .await
                .map_err(|e| ReportError::Storage(DisplayErrorContext(e).to_string()))?,
        };

        Ok(presigned.uri().to_string())
    }

    async fn put_object(
        &self,
        object: &StorageObject,
        body: Bytes,
        content_type: &str,
    ) -> ReportResult<()> {
        let client = self.client(&object.credentials).await?;

        tracing::info!(
            "Uploading {} bytes to s3://{}/{}",
            body.len(),
            object.bucket,
            object.path
        );

        client
            .put_object()
            .bucket(&object.bucket)
            .key(&object.path)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| ReportError::Storage(DisplayErrorContext(e).to_string()))?;

        Ok(())
    }
}
