use std::sync::Arc;

use serde::Deserialize;

use super::generation_failed;
use super::normalize::normalize_service;
use crate::core::{ClientConfig, ReportResult};
use crate::http::{HttpRequest, Transport};
use crate::models::GenerationRequest;
use crate::result::PdfResult;

#[derive(Debug, Deserialize)]
struct LocationEnvelope {
    location: String,
}

/// Asks the direct PDF service to render. The service answers with a
/// location, so the returned result is downloaded lazily.
pub(crate) async fn generate(
    request: &GenerationRequest,
    config: &ClientConfig,
    transport: &Arc<dyn Transport>,
) -> ReportResult<PdfResult> {
    let call = normalize_service(request, config)?;

    tracing::info!("Requesting PDF from {}", call.endpoint);

    let http = HttpRequest::post_json(&call.endpoint, &call.payload)?
        .header("Authorization", format!("Bearer {}", call.token));
    let response = transport.send(http).await?;

    if !response.is_success() {
        return Err(generation_failed(&response));
    }

    let envelope: LocationEnvelope = response.json()?;
    tracing::debug!("PDF available at {}", envelope.location);

    Ok(PdfResult::remote(envelope.location, transport.clone()))
}
