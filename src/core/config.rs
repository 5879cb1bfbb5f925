use std::collections::HashMap;

use config::{Config, Environment};

use super::error::ReportResult;

pub const DEFAULT_SERVICE_VERSION: &str = "v1";

/// Environment variables the client reads.
const ENV_KEYS: [&str; 5] = [
    "JOURNEY_PDF_KEY",
    "DOCRAPTOR_TOKEN",
    "AWS_REGION",
    "JOURNEY_PDF_SERVICE_URL",
    "JOURNEY_PDF_VERSION",
];

/// Process-wide defaults threaded explicitly through every generation call.
///
/// Nothing here is global: two clients with different configs never observe
/// each other, which keeps calls independent of test ordering.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Default token for the direct PDF service (`JOURNEY_PDF_KEY`).
    pub api_token: Option<String>,
    /// Default DocRaptor API key (`DOCRAPTOR_TOKEN`).
    pub docraptor_token: Option<String>,
    /// Ambient deployment region (`AWS_REGION`), used for region inference only.
    pub deployment_region: Option<String>,
    /// Overrides the templated service endpoint (`JOURNEY_PDF_SERVICE_URL`).
    pub service_url: Option<String>,
    /// Protocol version used in the templated endpoint (`JOURNEY_PDF_VERSION`).
    pub version: Option<String>,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Reads the ambient environment once, including a `.env` file if present.
    ///
    /// Only the known keys are read. A value that is not valid UTF-8 counts
    /// as unset, so a malformed `AWS_REGION` falls back to the default region.
    pub fn from_env() -> ReportResult<Self> {
        dotenv::dotenv().ok();

        let vars = ENV_KEYS
            .iter()
            .filter_map(|key| {
                let value = std::env::var_os(key)?.into_string().ok()?;
                Some((key.to_string(), value))
            })
            .collect();

        Self::from_map(vars)
    }

    /// Same as [`ClientConfig::from_env`] but reads from the given map instead
    /// of the process environment.
    pub fn from_map(vars: HashMap<String, String>) -> ReportResult<Self> {
        Self::load(Environment::default().source(Some(vars)))
    }

    fn load(source: Environment) -> ReportResult<Self> {
        let settings = Config::builder().add_source(source).build()?;

        let read = |key: &str| {
            settings
                .get_string(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
        };

        Ok(ClientConfig {
            api_token: read("journey_pdf_key"),
            docraptor_token: read("docraptor_token"),
            deployment_region: read("aws_region"),
            service_url: read("journey_pdf_service_url"),
            version: read("journey_pdf_version"),
        })
    }

    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_SERVICE_VERSION)
    }
}

#[derive(Default)]
pub struct ClientConfigBuilder {
    api_token: Option<String>,
    docraptor_token: Option<String>,
    deployment_region: Option<String>,
    service_url: Option<String>,
    version: Option<String>,
}

impl ClientConfigBuilder {
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn docraptor_token(mut self, token: impl Into<String>) -> Self {
        self.docraptor_token = Some(token.into());
        self
    }

    pub fn deployment_region(mut self, region: impl Into<String>) -> Self {
        self.deployment_region = Some(region.into());
        self
    }

    pub fn service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn build(self) -> ClientConfig {
        ClientConfig {
            api_token: self.api_token,
            docraptor_token: self.docraptor_token,
            deployment_region: self.deployment_region,
            service_url: self.service_url,
            version: self.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::normalize::resolve_region;

    #[test]
    fn test_from_map_reads_known_keys() {
        let mut vars = HashMap::new();
        vars.insert("JOURNEY_PDF_KEY".to_string(), "pdf-key".to_string());
        vars.insert("DOCRAPTOR_TOKEN".to_string(), "dr-key".to_string());
        vars.insert("AWS_REGION".to_string(), "eu-west-1".to_string());

        let config = ClientConfig::from_map(vars).unwrap();
        assert_eq!(config.api_token.as_deref(), Some("pdf-key"));
        assert_eq!(config.docraptor_token.as_deref(), Some("dr-key"));
        assert_eq!(config.deployment_region.as_deref(), Some("eu-west-1"));
        assert!(config.service_url.is_none());
        assert_eq!(config.version(), "v1");
    }

    #[test]
    fn test_blank_values_are_treated_as_absent() {
        let mut vars = HashMap::new();
        vars.insert("JOURNEY_PDF_KEY".to_string(), "   ".to_string());

        let config = ClientConfig::from_map(vars).unwrap();
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_unrecognized_region_falls_back_to_default() {
        let mut vars = HashMap::new();
        vars.insert("AWS_REGION".to_string(), "sa-east-1".to_string());

        let config = ClientConfig::from_map(vars).unwrap();
        assert_eq!(config.deployment_region.as_deref(), Some("sa-east-1"));
        assert_eq!(resolve_region(None, &config), "us");

        let mut vars = HashMap::new();
        vars.insert("AWS_REGION".to_string(), String::new());

        let config = ClientConfig::from_map(vars).unwrap();
        assert!(config.deployment_region.is_none());
        assert_eq!(resolve_region(None, &config), "us");
    }

    #[cfg(unix)]
    #[test]
    fn test_from_env_ignores_non_utf8_values() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let garbage = OsStr::from_bytes(b"\xff\xfe");
        std::env::set_var("AWS_REGION", garbage);
        std::env::set_var("PDF_REPORTS_UNRELATED_GARBAGE", garbage);

        let config = ClientConfig::from_env();

        std::env::remove_var("AWS_REGION");
        std::env::remove_var("PDF_REPORTS_UNRELATED_GARBAGE");

        let config = config.unwrap();
        assert!(config.deployment_region.is_none());
        assert_eq!(resolve_region(None, &config), "us");
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::builder()
            .api_token("abc")
            .version("v2")
            .build();
        assert_eq!(config.api_token.as_deref(), Some("abc"));
        assert_eq!(config.version(), "v2");
        assert!(config.deployment_region.is_none());
    }
}
