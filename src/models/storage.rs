use serde::{Deserialize, Serialize};

/// Credentials handed to the storage backend untouched.
///
/// For S3 the blob may carry `accessKeyId`, `secretAccessKey`,
/// `sessionToken` and `region`; this crate never inspects it outside the S3
/// implementation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageCredentials(pub serde_json::Value);

impl StorageCredentials {
    pub fn new(value: serde_json::Value) -> Self {
        StorageCredentials(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Where an uploaded report should be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageTarget {
    pub bucket: String,
    /// Prepended to `name` verbatim.
    #[serde(default)]
    pub prefix: Option<String>,
    /// File name including extension.
    pub name: String,
    #[serde(default)]
    pub credentials: StorageCredentials,
}

impl StorageTarget {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        StorageTarget {
            bucket: bucket.into(),
            prefix: None,
            name: name.into(),
            credentials: StorageCredentials::default(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_credentials(mut self, credentials: StorageCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Object key: `prefix + name`.
    ///
    /// No sanitization happens here. Components such as `../` or a leading
    /// `/` reach the storage backend unchanged, so callers must not pass
    /// untrusted input.
    pub fn path(&self) -> String {
        format!("{}{}", self.prefix.as_deref().unwrap_or(""), self.name)
    }

    pub fn object(&self) -> StorageObject {
        StorageObject {
            bucket: self.bucket.clone(),
            path: self.path(),
            name: self.name.clone(),
            credentials: self.credentials.clone(),
        }
    }
}

/// A resolved storage object, carrying what is needed to re-sign it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageObject {
    pub bucket: String,
    pub path: String,
    pub name: String,
    pub credentials: StorageCredentials,
}
