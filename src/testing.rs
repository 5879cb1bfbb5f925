//! In-memory collaborators for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::core::{ReportError, ReportResult};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::models::StorageObject;
use crate::storage::{ObjectStorage, SignOperation};

pub const SAMPLE_PDF: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\ntrailer\n%%EOF\n";

type Responder = Box<dyn Fn(&HttpRequest) -> ReportResult<HttpResponse> + Send + Sync>;

pub struct MockTransport {
    responder: Responder,
    delay: Option<Duration>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&HttpRequest) -> ReportResult<HttpResponse> + Send + Sync + 'static,
    {
        MockTransport {
            responder: Box::new(responder),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the same status and body.
    pub fn fixed(status: u16, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self::new(move |_| Ok(HttpResponse::new(status, body.clone())))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> ReportResult<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(&request)
    }
}

/// Signs URLs as `mock://<op>/<bucket>/<path>?expires=<secs>` and records puts.
#[derive(Default)]
pub struct MockStorage {
    pub signed: AtomicUsize,
    pub puts: Mutex<Vec<(StorageObject, Bytes, String)>>,
    pub fail_puts: bool,
}

impl MockStorage {
    pub fn failing() -> Self {
        MockStorage {
            fail_puts: true,
            ..Default::default()
        }
    }

    pub fn url(operation: SignOperation, object: &StorageObject, expires_in: Duration) -> String {
        let op = match operation {
            SignOperation::Get => "get",
            SignOperation::Put => "put",
        };
        format!(
            "mock://{}/{}/{}?expires={}",
            op,
            object.bucket,
            object.path,
            expires_in.as_secs()
        )
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn sign(
        &self,
        operation: SignOperation,
        object: &StorageObject,
        expires_in: Duration,
    ) -> ReportResult<String> {
        self.signed.fetch_add(1, Ordering::SeqCst);
        Ok(Self::url(operation, object, expires_in))
    }

    async fn put_object(
        &self,
        object: &StorageObject,
        body: Bytes,
        content_type: &str,
    ) -> ReportResult<()> {
        if self.fail_puts {
            return Err(ReportError::Storage("AccessDenied".to_string()));
        }
        self.puts
            .lock()
            .unwrap()
            .push((object.clone(), body, content_type.to_string()));
        Ok(())
    }
}
