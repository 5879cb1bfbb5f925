pub mod docraptor;
pub mod normalize;
pub mod service;

use std::sync::Arc;

use crate::core::{ClientConfig, ReportError, ReportResult};
use crate::http::{HttpResponse, ReqwestTransport, Transport};
use crate::models::{Backend, GenerationRequest, StorageTarget};
use crate::result::PdfResult;
use crate::storage::upload::{UploadSource, Uploader};
use crate::storage::{ObjectStorage, S3Storage};

pub(crate) fn generation_failed(response: &HttpResponse) -> ReportError {
    tracing::warn!("PDF generation failed with status {}", response.status);
    ReportError::GenerationFailed {
        status: response.status,
        status_text: response.status_text.clone(),
        body: response.text(),
    }
}

/// Entry point for generating and storing PDFs.
///
/// Every call issues exactly one request to the chosen backend and never
/// retries; failures are returned as-is.
#[derive(Clone)]
pub struct PdfClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    uploader: Uploader,
}

impl PdfClient {
    /// Client using reqwest for HTTP and S3 for storage.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_backends(
            config,
            Arc::new(ReqwestTransport::new()),
            Arc::new(S3Storage::new()),
        )
    }

    pub fn from_env() -> ReportResult<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn with_backends(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        let uploader = Uploader::new(storage, transport.clone());
        PdfClient {
            config,
            transport,
            uploader,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Renders one PDF with the backend selected in the request.
    pub async fn generate(&self, request: &GenerationRequest) -> ReportResult<PdfResult> {
        match &request.backend {
            Backend::Service => service::generate(request, &self.config, &self.transport).await,
            Backend::DocRaptor(options) => {
                docraptor::generate(request, options, &self.config, &self.transport).await
            }
        }
    }

    /// Renders a PDF and lets the service write it straight to storage.
    ///
    /// DocRaptor cannot write to a signed URL, so a DocRaptor request is
    /// rendered first and its bytes uploaded from here.
    pub async fn generate_and_upload(
        &self,
        request: &GenerationRequest,
        target: &StorageTarget,
    ) -> ReportResult<PdfResult> {
        if let Backend::DocRaptor(_) = request.backend {
            let generated = self.generate(request).await?;
            return self.upload(&generated, target).await;
        }

        let object = target.object();
        let upload_to = self.uploader.presign_upload(&object).await?;

        tracing::info!("Generating PDF into s3://{}/{}", object.bucket, object.path);

        let request = request.clone().with_upload_to(upload_to);
        self.generate(&request).await?;

        Ok(self.uploader.pending(object))
    }

    /// Uploads bytes, or an existing result, to storage.
    pub async fn upload<'a>(
        &self,
        source: impl Into<UploadSource<'a>>,
        target: &StorageTarget,
    ) -> ReportResult<PdfResult> {
        self.uploader.upload(source.into(), target).await
    }
}
