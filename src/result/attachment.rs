use serde::{Deserialize, Serialize};

/// Attachment record in the shape mail APIs such as SendGrid accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAttachment {
    /// Base64 encoded document.
    pub content: String,
    pub filename: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub disposition: String,
}

impl EmailAttachment {
    pub fn pdf(content: String, filename: impl Into<String>) -> Self {
        EmailAttachment {
            content,
            filename: filename.into(),
            mime_type: "application/pdf".to_string(),
            disposition: "attachment".to_string(),
        }
    }
}
