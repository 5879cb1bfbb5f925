//! Client for remote PDF rendering services.
//!
//! A [`PdfClient`] sends a [`GenerationRequest`] to the direct PDF service or
//! to DocRaptor and hands back a [`PdfResult`], which downloads the document
//! only when its bytes are first needed. Results can be uploaded to S3, or
//! rendered straight into S3 by the service.

pub mod core;
pub mod generators;
pub mod http;
pub mod models;
pub mod result;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use crate::core::{ClientConfig, ReportError, ReportResult};
pub use generators::PdfClient;
pub use http::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use models::{
    Backend, DocRaptorOptions, GenerationRequest, PrintSetup, StorageCredentials, StorageObject,
    StorageTarget,
};
pub use result::{is_pdf, EmailAttachment, PdfResult};
pub use storage::upload::UploadSource;
pub use storage::{ObjectStorage, S3Storage, SignOperation};
