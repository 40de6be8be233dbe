use crate::error::CoreError;
use crate::limits::{DELETION_CODE_LENGTH, MIN_ID_LENGTH};
use bytes::Bytes;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::net::IpAddr;
use subtle::ConstantTimeEq;

/// The key of a stored object.
///
/// Generated identifiers are either 10 URL-safe characters or 56 zero-width
/// characters, optionally followed by `.{extension}`. Transport mailboxes are
/// keyed by the caller's network address instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Validates an identifier taken from a request path.
    ///
    /// Valid identifiers are at least 10 characters long (counted as Unicode
    /// scalar values) and do not contain a path separator.
    pub fn parse(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        let length = id.chars().count();
        if length < MIN_ID_LENGTH {
            return Err(CoreError::InvalidObjectId(format!(
                "length must be at least {MIN_ID_LENGTH}, got {length}"
            )));
        }
        if id.contains('/') {
            return Err(CoreError::InvalidObjectId(format!(
                "must not contain '/': '{id}'"
            )));
        }
        Ok(Self(id))
    }

    /// Creates an `ObjectId` without validation.
    ///
    /// Use this only for identifiers produced by trusted internal sources
    /// (generators, mailbox addresses).
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The transport mailbox key for a caller address.
    pub fn mailbox(addr: IpAddr) -> Self {
        Self(addr.to_string())
    }

    /// Appends `.{extension}` to the identifier.
    pub fn with_extension(self, extension: &str) -> Self {
        Self(format!("{}.{}", self.0, extension))
    }

    /// Generates the full locator based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The secret that authorizes deleting one object.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeletionCode(String);

impl DeletionCode {
    /// Validates a deletion code supplied by a client.
    pub fn parse(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        let length = code.chars().count();
        if length != DELETION_CODE_LENGTH {
            return Err(CoreError::InvalidDeletionCode(format!(
                "length must be exactly {DELETION_CODE_LENGTH}, got {length}"
            )));
        }
        Ok(Self(code))
    }

    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Compares against a candidate code in constant time.
    pub fn matches(&self, candidate: &DeletionCode) -> bool {
        self.0.as_bytes().ct_eq(candidate.0.as_bytes()).into()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for DeletionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DeletionCode(..)")
    }
}

/// Metadata specific to file objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Declared MIME type, `type/subtype`.
    pub mime: String,
    /// Filename suffix, never set for invisible-mode identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Pre-rendered Open Graph / Twitter Card tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_data: Option<String>,
}

/// What a stored payload holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    /// The payload is the UTF-8 text of a URL to redirect to.
    Url,
    /// The payload is raw file bytes.
    File(FileInfo),
}

/// Metadata persisted alongside every payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub id: ObjectId,
    /// Payload size in bytes (URL length for url objects).
    pub size: u64,
    pub deletion_code: DeletionCode,
    /// IANA zone name of the uploader.
    pub timezone: String,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_seconds: Option<u64>,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl ObjectMetadata {
    pub fn is_url(&self) -> bool {
        matches!(self.kind, ObjectKind::Url)
    }

    /// The declared MIME type for file objects.
    pub fn mime(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::File(info) => Some(info.mime.as_str()),
            ObjectKind::Url => None,
        }
    }

    pub fn embed_data(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::File(info) => info.embed_data.as_deref(),
            ObjectKind::Url => None,
        }
    }
}

/// A payload together with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub metadata: ObjectMetadata,
    pub payload: Bytes,
}
