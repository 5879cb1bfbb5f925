//! Turns a [`GenerationRequest`] plus the client defaults into the exact body
//! each backend receives.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::{ClientConfig, ReportError, ReportResult};
use crate::models::{ContentSource, DocRaptorOptions, GenerationRequest, PrintSetup};

pub const DEFAULT_REGION: &str = "us";
pub const DOCRAPTOR_URL: &str = "https://docraptor.com/docs";

const KNOWN_REGIONS: [&str; 3] = ["us", "eu", "ap"];

/// Maps an ambient deployment region such as `eu-west-1` to a service region.
/// Anything unset or unrecognized falls back to [`DEFAULT_REGION`].
pub fn infer_region(ambient: Option<&str>) -> &'static str {
    ambient
        .and_then(|region| {
            KNOWN_REGIONS
                .iter()
                .copied()
                .find(|known| region.starts_with(known))
        })
        .unwrap_or(DEFAULT_REGION)
}

pub fn resolve_region(explicit: Option<&str>, config: &ClientConfig) -> String {
    match explicit {
        Some(region) => region.to_string(),
        None => infer_region(config.deployment_region.as_deref()).to_string(),
    }
}

/// Explicit override > configured override > URL templated from region and version.
pub fn service_endpoint(request: &GenerationRequest, config: &ClientConfig) -> String {
    if let Some(url) = request.service_url.as_ref().or(config.service_url.as_ref()) {
        return url.clone();
    }

    let region = resolve_region(request.region.as_deref(), config);
    let version = request.version.as_deref().unwrap_or_else(|| config.version());
    format!("https://pdf-{}.journeyapps.com/{}/generate-pdf", region, version)
}

/// Body posted to the direct PDF service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub test: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<PrintSetup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_to: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServiceCall {
    pub endpoint: String,
    pub token: String,
    pub payload: ServicePayload,
}

/// Fails with [`ReportError::AuthenticationRequired`] when neither the request
/// nor the config carries a token.
pub fn normalize_service(
    request: &GenerationRequest,
    config: &ClientConfig,
) -> ReportResult<ServiceCall> {
    let token = request
        .token
        .as_ref()
        .or(config.api_token.as_ref())
        .cloned()
        .ok_or(ReportError::AuthenticationRequired)?;

    let (html, url) = match request.content() {
        Some(ContentSource::Url(url)) => (None, Some(url.to_string())),
        Some(ContentSource::Html(html)) => (Some(html.to_string()), None),
        None => (None, None),
    };

    Ok(ServiceCall {
        endpoint: service_endpoint(request, config),
        token,
        payload: ServicePayload {
            html,
            url,
            test: request.test,
            print: request.print.clone(),
            upload_to: request.upload_to.clone(),
        },
    })
}

/// Builds the DocRaptor body.
///
/// Never fails for a missing key: without one the body is forced into test
/// mode instead.
pub fn normalize_docraptor(
    request: &GenerationRequest,
    options: &DocRaptorOptions,
    config: &ClientConfig,
) -> ReportResult<Value> {
    let api_key = request
        .token
        .as_ref()
        .or(options.user_credentials.as_ref())
        .or(config.docraptor_token.as_ref());

    let mut body = Map::new();
    body.insert("type".into(), Value::from("pdf"));
    body.insert("javascript".into(), Value::from(true));
    body.insert("test".into(), Value::from(request.test || api_key.is_none()));
    body.insert(
        "prince_options".into(),
        serde_json::json!({ "no_compress": false }),
    );

    let overrides = serde_json::to_value(options)
        .map_err(|e| ReportError::InvalidRequest(format!("Cannot encode DocRaptor options: {}", e)))?;
    if let Value::Object(overrides) = overrides {
        body.extend(overrides);
    }

    match api_key {
        Some(key) => {
            body.insert("user_credentials".into(), Value::from(key.as_str()));
        }
        None => {
            body.remove("user_credentials");
            body.insert("test".into(), Value::from(true));
        }
    }

    body.remove("document_content");
    body.remove("document_url");
    match request.content() {
        Some(ContentSource::Url(url)) => {
            body.insert("document_url".into(), Value::from(url));
        }
        Some(ContentSource::Html(html)) => {
            body.insert("document_content".into(), Value::from(html));
        }
        None => {}
    }

    Ok(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::default()
    }

    #[test]
    fn test_region_inference() {
        assert_eq!(infer_region(Some("us-east-1")), "us");
        assert_eq!(infer_region(Some("eu-west-1")), "eu");
        assert_eq!(infer_region(Some("ap-southeast-2")), "ap");
        assert_eq!(infer_region(Some("sa-east-1")), "us");
        assert_eq!(infer_region(Some("")), "us");
        assert_eq!(infer_region(Some("\u{0}garbage")), "us");
        assert_eq!(infer_region(None), "us");
    }

    #[test]
    fn test_explicit_region_wins_over_ambient() {
        let config = ClientConfig::builder().deployment_region("eu-central-1").build();
        assert_eq!(resolve_region(Some("ap"), &config), "ap");
        assert_eq!(resolve_region(None, &config), "eu");
    }

    #[test]
    fn test_endpoint_resolution() {
        let config = ClientConfig::builder().deployment_region("eu-west-1").build();
        let request = GenerationRequest::html("Test");
        assert_eq!(
            service_endpoint(&request, &config),
            "https://pdf-eu.journeyapps.com/v1/generate-pdf"
        );

        let request = GenerationRequest::html("Test").with_region("ap").with_version("v2");
        assert_eq!(
            service_endpoint(&request, &config),
            "https://pdf-ap.journeyapps.com/v2/generate-pdf"
        );

        let request = GenerationRequest::html("Test").with_service_url("http://localhost:9000/pdf");
        assert_eq!(service_endpoint(&request, &config), "http://localhost:9000/pdf");
    }

    #[test]
    fn test_service_requires_token() {
        let err = normalize_service(&GenerationRequest::html("Test"), &config()).unwrap_err();
        assert!(matches!(err, ReportError::AuthenticationRequired));
    }

    #[test]
    fn test_service_token_precedence() {
        let config = ClientConfig::builder().api_token("global").build();

        let call = normalize_service(&GenerationRequest::html("Test"), &config).unwrap();
        assert_eq!(call.token, "global");

        let call =
            normalize_service(&GenerationRequest::html("Test").with_token("local"), &config).unwrap();
        assert_eq!(call.token, "local");
    }

    #[test]
    fn test_service_payload_prefers_url() {
        let request = GenerationRequest::html("<p>ignored</p>")
            .with_url("https://example.com")
            .with_token("t")
            .with_upload_to("https://bucket.s3.amazonaws.com/x.pdf?sig");
        let call = normalize_service(&request, &config()).unwrap();

        let body = serde_json::to_value(&call.payload).unwrap();
        assert_eq!(body["url"], "https://example.com");
        assert!(body.get("html").is_none());
        assert_eq!(body["uploadTo"], "https://bucket.s3.amazonaws.com/x.pdf?sig");
        assert_eq!(body["test"], false);
        assert!(body.get("token").is_none());
    }

    #[test]
    fn test_docraptor_defaults_with_key() {
        let config = ClientConfig::builder().docraptor_token("dr-key").build();
        let body = normalize_docraptor(
            &GenerationRequest::html("Test"),
            &DocRaptorOptions::new(),
            &config,
        )
        .unwrap();

        assert_eq!(body["type"], "pdf");
        assert_eq!(body["javascript"], true);
        assert_eq!(body["test"], false);
        assert_eq!(body["prince_options"]["no_compress"], false);
        assert_eq!(body["user_credentials"], "dr-key");
        assert_eq!(body["document_content"], "Test");
        assert!(body.get("document_url").is_none());
    }

    #[test]
    fn test_docraptor_without_key_forces_test_mode() {
        let options = DocRaptorOptions {
            test: Some(false),
            ..Default::default()
        };
        let body = normalize_docraptor(&GenerationRequest::html("Test"), &options, &config())
            .unwrap();

        assert_eq!(body["test"], true);
        assert!(body.get("user_credentials").is_none());
    }

    #[test]
    fn test_docraptor_key_precedence() {
        let config = ClientConfig::builder().docraptor_token("global").build();
        let options = DocRaptorOptions::new().with_credentials("embedded");

        let body = normalize_docraptor(&GenerationRequest::html("Test"), &options, &config)
            .unwrap();
        assert_eq!(body["user_credentials"], "embedded");

        let request = GenerationRequest::html("Test").with_token("per-call");
        let body = normalize_docraptor(&request, &options, &config).unwrap();
        assert_eq!(body["user_credentials"], "per-call");
    }

    #[test]
    fn test_docraptor_overrides_are_merged() {
        let config = ClientConfig::builder().docraptor_token("k").build();
        let options = DocRaptorOptions {
            javascript: Some(false),
            prince_options: Some(serde_json::json!({ "media": "screen" })),
            ..DocRaptorOptions::new().with_tag("pdf-reports-test")
        };
        let request = GenerationRequest::html("Test").with_url("https://example.com");
        let body = normalize_docraptor(&request, &options, &config).unwrap();

        assert_eq!(body["javascript"], false);
        assert_eq!(body["tag"], "pdf-reports-test");
        assert_eq!(body["prince_options"]["media"], "screen");
        assert_eq!(body["document_url"], "https://example.com");
        assert!(body.get("document_content").is_none());
    }
}
