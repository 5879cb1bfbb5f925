use serde::{Deserialize, Serialize};

/// DocRaptor-specific request fields.
///
/// Anything set here is merged over the defaults the client fills in
/// (`type`, `javascript`, `prince_options`). `test`, `user_credentials`,
/// `document_content` and `document_url` are managed by the client and are
/// overwritten during normalization, except that an explicit
/// `user_credentials` acts as the embedded DocRaptor key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocRaptorOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prince_options: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javascript: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_console_messages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_resource_errors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_credentials: Option<String>,

    // Accepted by DocRaptor but not used by this client
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub async_: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl DocRaptorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_credentials(mut self, key: impl Into<String>) -> Self {
        self.user_credentials = Some(key.into());
        self
    }

    pub fn ignore_console_messages(mut self, ignore: bool) -> Self {
        self.ignore_console_messages = Some(ignore);
        self
    }
}
