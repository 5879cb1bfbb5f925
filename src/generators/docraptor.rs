use std::sync::Arc;

use super::generation_failed;
use super::normalize::{normalize_docraptor, DOCRAPTOR_URL};
use crate::core::{ClientConfig, ReportError, ReportResult};
use crate::http::{HttpRequest, Transport};
use crate::models::{DocRaptorOptions, GenerationRequest};
use crate::result::PdfResult;

/// Renders through DocRaptor. The response body is the PDF itself, so the
/// returned result is already resident. A success with an empty body is an
/// [`ReportError::InvalidResult`].
pub(crate) async fn generate(
    request: &GenerationRequest,
    options: &DocRaptorOptions,
    config: &ClientConfig,
    transport: &Arc<dyn Transport>,
) -> ReportResult<PdfResult> {
    let body = normalize_docraptor(request, options, config)?;
    if body["test"] == true {
        tracing::info!("Requesting PDF from DocRaptor (test mode)");
    } else {
        tracing::info!("Requesting PDF from DocRaptor");
    }

    let response = transport
        .send(HttpRequest::post_json(DOCRAPTOR_URL, &body)?)
        .await?;

    if !response.is_success() {
        return Err(generation_failed(&response));
    }

    let bytes = response.bytes();
    if bytes.is_empty() {
        return Err(ReportError::InvalidResult(
            "DocRaptor returned an empty body".to_string(),
        ));
    }

    tracing::debug!("Received PDF from DocRaptor ({} bytes)", bytes.len());
    Ok(PdfResult::from_bytes(bytes))
}
