pub mod s3;
pub mod upload;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::core::ReportResult;
use crate::models::StorageObject;

pub use s3::S3Storage;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Expiry of the URL used internally to read a stored report back.
pub const DOWNLOAD_URL_EXPIRY: Duration = Duration::from_secs(300);

/// Default expiry of a URL handed out for sharing.
pub const SHARE_URL_EXPIRY: Duration = Duration::from_secs(86400 * 7);

/// Expiry of the write URL given to the rendering backend.
pub const UPLOAD_URL_EXPIRY: Duration = Duration::from_secs(900);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOperation {
    Get,
    Put,
}

/// Object storage able to pre-sign URLs and accept direct writes.
///
/// Credentials travel inside each [`StorageObject`]; implementations decide
/// how to interpret them.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Signing does not touch stored state and may be repeated freely.
    async fn sign(
        &self,
        operation: SignOperation,
        object: &StorageObject,
        expires_in: Duration,
    ) -> ReportResult<String>;

    async fn put_object(
        &self,
        object: &StorageObject,
        body: Bytes,
        content_type: &str,
    ) -> ReportResult<()>;
}
