use serde::{Deserialize, Serialize};

use super::{DocRaptorOptions, PrintSetup};

/// Which rendering backend handles a generation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// The direct PDF service. Answers with a download location.
    #[default]
    Service,
    /// DocRaptor. Answers with the document itself.
    DocRaptor(DocRaptorOptions),
}

/// Everything a caller can say about one PDF.
///
/// `html` and `url` are both accepted; when both are set the URL wins and
/// `html` is dropped from the outgoing payload. This is not rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub html: Option<String>,
    pub url: Option<String>,
    /// Ask the backend for a sandboxed (watermarked) render.
    #[serde(default)]
    pub test: bool,
    pub print: Option<PrintSetup>,
    /// Per-call token; wins over every configured default.
    pub token: Option<String>,
    #[serde(default)]
    pub backend: Backend,
    /// "us", "eu" or "ap". Inferred when absent.
    pub region: Option<String>,
    /// Protocol version segment of the service URL.
    pub version: Option<String>,
    /// Full endpoint override for the direct service.
    pub service_url: Option<String>,
    /// Pre-signed URL the backend uploads the result to.
    pub upload_to: Option<String>,
}

impl GenerationRequest {
    pub fn html(html: impl Into<String>) -> Self {
        GenerationRequest {
            html: Some(html.into()),
            ..Default::default()
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        GenerationRequest {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    pub fn with_print(mut self, print: PrintSetup) -> Self {
        self.print = Some(print);
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    pub fn with_upload_to(mut self, url: impl Into<String>) -> Self {
        self.upload_to = Some(url.into());
        self
    }

    pub fn with_docraptor(mut self, options: DocRaptorOptions) -> Self {
        self.backend = Backend::DocRaptor(options);
        self
    }

    pub fn content(&self) -> Option<ContentSource<'_>> {
        ContentSource::resolve(self.html.as_deref(), self.url.as_deref())
    }
}

/// The single content source that reaches a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource<'a> {
    Html(&'a str),
    Url(&'a str),
}

impl<'a> ContentSource<'a> {
    /// URL takes precedence over inline markup.
    pub fn resolve(html: Option<&'a str>, url: Option<&'a str>) -> Option<Self> {
        match (url, html) {
            (Some(url), _) => Some(ContentSource::Url(url)),
            (None, Some(html)) => Some(ContentSource::Html(html)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_wins_over_html() {
        let request = GenerationRequest::html("<p>hi</p>").with_url("https://example.com");
        assert_eq!(request.content(), Some(ContentSource::Url("https://example.com")));
    }

    #[test]
    fn test_single_sources() {
        assert_eq!(
            GenerationRequest::html("Test").content(),
            Some(ContentSource::Html("Test"))
        );
        assert_eq!(GenerationRequest::default().content(), None);
    }

    #[test]
    fn test_default_backend_is_service() {
        assert_eq!(GenerationRequest::html("Test").backend, Backend::Service);
        let request = GenerationRequest::html("Test").with_docraptor(DocRaptorOptions::new());
        assert!(matches!(request.backend, Backend::DocRaptor(_)));
    }
}
