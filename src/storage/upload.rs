use std::sync::Arc;

use bytes::Bytes;

use super::{ObjectStorage, SignOperation, PDF_CONTENT_TYPE, UPLOAD_URL_EXPIRY};
use crate::core::ReportResult;
use crate::http::Transport;
use crate::models::{StorageObject, StorageTarget};
use crate::result::PdfResult;

/// What [`Uploader::upload`] writes to storage.
pub enum UploadSource<'a> {
    Bytes(Bytes),
    Result(&'a PdfResult),
}

impl From<Bytes> for UploadSource<'_> {
    fn from(bytes: Bytes) -> Self {
        UploadSource::Bytes(bytes)
    }
}

impl From<Vec<u8>> for UploadSource<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        UploadSource::Bytes(Bytes::from(bytes))
    }
}

impl<'a> From<&'a PdfResult> for UploadSource<'a> {
    fn from(result: &'a PdfResult) -> Self {
        UploadSource::Result(result)
    }
}

impl UploadSource<'_> {
    async fn into_bytes(self) -> ReportResult<Bytes> {
        match self {
            UploadSource::Bytes(bytes) => Ok(bytes),
            UploadSource::Result(result) => result.materialize().await,
        }
    }
}

/// Binds storage targets to [`PdfResult`]s.
#[derive(Clone)]
pub struct Uploader {
    storage: Arc<dyn ObjectStorage>,
    transport: Arc<dyn Transport>,
}

impl Uploader {
    pub fn new(storage: Arc<dyn ObjectStorage>, transport: Arc<dyn Transport>) -> Self {
        Uploader { storage, transport }
    }

    /// Writes the bytes to `target` and returns a stored result that already
    /// holds them.
    pub async fn upload(
        &self,
        source: UploadSource<'_>,
        target: &StorageTarget,
    ) -> ReportResult<PdfResult> {
        let bytes = source.into_bytes().await?;
        let object = target.object();

        self.storage
            .put_object(&object, bytes.clone(), PDF_CONTENT_TYPE)
            .await?;

        Ok(PdfResult::stored_with_bytes(
            object,
            self.storage.clone(),
            self.transport.clone(),
            bytes,
        ))
    }

    /// Signs a write URL so a rendering backend can upload to `object` itself.
    pub async fn presign_upload(&self, object: &StorageObject) -> ReportResult<String> {
        self.storage
            .sign(SignOperation::Put, object, UPLOAD_URL_EXPIRY)
            .await
    }

    /// A stored result for an object someone else has written.
    pub fn pending(&self, object: StorageObject) -> PdfResult {
        PdfResult::stored(object, self.storage.clone(), self.transport.clone())
    }
}
