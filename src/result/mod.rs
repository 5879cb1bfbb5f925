//! Lazily materialized handle to a rendered PDF.

pub mod attachment;

pub use attachment::EmailAttachment;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::OnceCell;

use crate::core::{ReportError, ReportResult};
use crate::http::{HttpRequest, Transport};
use crate::models::StorageObject;
use crate::storage::{ObjectStorage, SignOperation, DOWNLOAD_URL_EXPIRY, SHARE_URL_EXPIRY};

/// Every PDF this crate has seen starts with this, followed by the minor
/// version (`%PDF-1.4`, `%PDF-1.5`, ...).
pub const PDF_SIGNATURE: &[u8] = b"%PDF-1.";

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_SIGNATURE)
}

type Fetch = Shared<BoxFuture<'static, ReportResult<Bytes>>>;

struct InFlight {
    id: u64,
    fetch: Fetch,
}

/// How the bytes of a result are obtained. Fixed at construction.
#[derive(Clone)]
enum Materializer {
    /// Bytes were known up front.
    Resident,
    /// A plain download location returned by the rendering service.
    Remote {
        location: String,
        transport: Arc<dyn Transport>,
    },
    /// An object in storage, read through a short-lived signed URL.
    SignedStorage {
        object: StorageObject,
        storage: Arc<dyn ObjectStorage>,
        transport: Arc<dyn Transport>,
    },
}

impl Materializer {
    fn fetch(&self) -> BoxFuture<'static, ReportResult<Bytes>> {
        match self.clone() {
            Materializer::Resident => async {
                Err::<Bytes, _>(ReportError::InvalidResult("Cannot download".to_string()))
            }
            .boxed(),
            Materializer::Remote { location, transport } => {
                async move { download(transport.as_ref(), &location).await }.boxed()
            }
            Materializer::SignedStorage {
                object,
                storage,
                transport,
            } => async move {
                let url = storage
                    .sign(SignOperation::Get, &object, DOWNLOAD_URL_EXPIRY)
                    .await?;
                download(transport.as_ref(), &url).await
            }
            .boxed(),
        }
    }
}

async fn download(transport: &dyn Transport, url: &str) -> ReportResult<Bytes> {
    tracing::debug!("Downloading PDF");

    let response = transport.send(HttpRequest::get(url)).await?;
    if !response.is_success() {
        tracing::warn!("PDF download failed with status {}", response.status);
        return Err(ReportError::DownloadFailed {
            status: response.status,
            status_text: response.status_text.clone(),
            body: response.text(),
        });
    }

    let bytes = response.bytes();
    if bytes.is_empty() {
        return Err(ReportError::InvalidResult(
            "download returned an empty body".to_string(),
        ));
    }

    tracing::debug!("Downloaded PDF ({} bytes)", bytes.len());
    Ok(bytes)
}

/// A rendered PDF that may or may not have been downloaded yet.
///
/// The first [`materialize`](PdfResult::materialize) performs at most one
/// fetch; concurrent callers share it, and once it succeeds the bytes are kept
/// for the lifetime of the value. A failed fetch leaves nothing cached and is
/// reported to every caller that was waiting on it; the next call starts a new
/// fetch.
pub struct PdfResult {
    materializer: Materializer,
    cache: OnceCell<Bytes>,
    in_flight: Mutex<Option<InFlight>>,
    next_fetch_id: AtomicU64,
}

impl PdfResult {
    fn with_materializer(materializer: Materializer, bytes: Option<Bytes>) -> Self {
        let cache = match bytes {
            Some(bytes) => OnceCell::new_with(Some(bytes)),
            None => OnceCell::new(),
        };

        PdfResult {
            materializer,
            cache,
            in_flight: Mutex::new(None),
            next_fetch_id: AtomicU64::new(0),
        }
    }

    /// Wraps bytes that are already in memory.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::with_materializer(Materializer::Resident, Some(bytes.into()))
    }

    /// A result downloaded from `location` on first use.
    pub fn remote(location: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self::with_materializer(
            Materializer::Remote {
                location: location.into(),
                transport,
            },
            None,
        )
    }

    /// A result stored at `object`, read back through a signed URL on first use.
    pub fn stored(
        object: StorageObject,
        storage: Arc<dyn ObjectStorage>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self::with_materializer(
            Materializer::SignedStorage {
                object,
                storage,
                transport,
            },
            None,
        )
    }

    /// A stored result whose bytes are already known, so no read-back is needed.
    pub fn stored_with_bytes(
        object: StorageObject,
        storage: Arc<dyn ObjectStorage>,
        transport: Arc<dyn Transport>,
        bytes: Bytes,
    ) -> Self {
        Self::with_materializer(
            Materializer::SignedStorage {
                object,
                storage,
                transport,
            },
            Some(bytes),
        )
    }

    pub fn is_resident(&self) -> bool {
        self.cache.initialized()
    }

    /// Download location, for results returned by the direct service.
    pub fn location(&self) -> Option<&str> {
        match &self.materializer {
            Materializer::Remote { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Storage object, for uploaded results.
    pub fn storage_object(&self) -> Option<&StorageObject> {
        match &self.materializer {
            Materializer::SignedStorage { object, .. } => Some(object),
            _ => None,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the PDF bytes, fetching them on first use.
    ///
    /// A download that succeeds with an empty body fails with
    /// [`ReportError::InvalidResult`]. Resident bytes are returned as given.
    pub async fn materialize(&self) -> ReportResult<Bytes> {
        if let Some(bytes) = self.cache.get() {
            return Ok(bytes.clone());
        }

        let (id, fetch) = {
            let mut slot = self.slot();
            if let Some(bytes) = self.cache.get() {
                return Ok(bytes.clone());
            }
            match slot.as_ref() {
                Some(in_flight) => (in_flight.id, in_flight.fetch.clone()),
                None => {
                    let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                    let fetch = self.materializer.fetch().shared();
                    *slot = Some(InFlight {
                        id,
                        fetch: fetch.clone(),
                    });
                    (id, fetch)
                }
            }
        };

        let outcome = fetch.await;
        if let Ok(bytes) = &outcome {
            // Only the first settled waiter wins; the value is identical for all.
            let _ = self.cache.set(bytes.clone());
        }

        let mut slot = self.slot();
        if slot.as_ref().map(|in_flight| in_flight.id) == Some(id) {
            *slot = None;
        }

        outcome
    }

    /// Base64 encoding of the materialized bytes.
    pub async fn to_base64(&self) -> ReportResult<String> {
        let bytes = self.materialize().await?;
        Ok(STANDARD.encode(&bytes))
    }

    pub async fn to_email_attachment(&self, name: &str) -> ReportResult<EmailAttachment> {
        Ok(EmailAttachment::pdf(self.to_base64().await?, name))
    }

    /// Signed download URL for a stored result.
    ///
    /// Without an explicit expiry, or with a zero one, the URL is valid for
    /// 7 days, which is meant for sharing; the crate's own read-back uses a
    /// 300 second URL.
    pub async fn signed_url(&self, expires_in: Option<Duration>) -> ReportResult<String> {
        match &self.materializer {
            Materializer::SignedStorage {
                object, storage, ..
            } => {
                storage
                    .sign(
                        SignOperation::Get,
                        object,
                        expires_in
                            .filter(|expiry| !expiry.is_zero())
                            .unwrap_or(SHARE_URL_EXPIRY),
                    )
                    .await
            }
            _ => Err(ReportError::Storage(
                "signed URLs are only available for stored results".to_string(),
            )),
        }
    }
}

impl fmt::Debug for PdfResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.materializer {
            Materializer::Resident => "resident",
            Materializer::Remote { .. } => "remote",
            Materializer::SignedStorage { .. } => "signed_storage",
        };
        f.debug_struct("PdfResult")
            .field("kind", &kind)
            .field("location", &self.location())
            .field("storage_object", &self.storage_object())
            .field("cached_bytes", &self.cache.get().map(Bytes::len))
            .finish()
    }
}
