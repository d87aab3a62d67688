//! Media upload types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, MediaError, ValidationError};

/// Image mime types accepted for upload.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum accepted image size: 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// An uploaded image awaiting storage.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub bytes: Vec<u8>,
    /// Filename as sent by the client.
    pub original_name: String,
    /// Mime type as declared by the client.
    pub mime: String,
}

impl MediaUpload {
    pub fn new(bytes: Vec<u8>, original_name: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            original_name: original_name.into(),
            mime: mime.into(),
        }
    }

    /// Check the declared mime type and the size ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Unsupported`] for a non-image mime type and
    /// [`MediaError::TooLarge`] for payloads over [`MAX_IMAGE_BYTES`].
    pub fn check(&self) -> Result<(), Error> {
        if !ALLOWED_IMAGE_TYPES.contains(&self.mime.as_str()) {
            return Err(MediaError::Unsupported {
                mime: self.mime.clone(),
            }
            .into());
        }

        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(MediaError::TooLarge {
                size: self.bytes.len(),
                limit: MAX_IMAGE_BYTES,
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Debug for MediaUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaUpload")
            .field("original_name", &self.original_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Name of a stored media file, relative to the uploads directory.
///
/// Never contains a path separator, so it cannot address anything outside
/// the directory it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaRef(String);

impl MediaRef {
    /// Wrap an existing filename, validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, `.`/`..`, or contains a path
    /// separator.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Derive the stored filename for an upload created at `millis`:
    /// `{millis}-{sanitized original name}`.
    pub fn for_upload(millis: u64, original_name: &str) -> Self {
        Self(format!("{}-{}", millis, sanitize_filename(original_name)))
    }

    /// Returns the filename.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let reason = if s.is_empty() {
            Some("cannot be empty")
        } else if s == "." || s == ".." {
            Some("cannot be '.' or '..'")
        } else if s.contains(['/', '\\']) {
            Some("cannot contain a path separator")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ValidationError::InvalidMediaRef {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }
}

/// Keep the final path component and replace anything outside
/// `[A-Za-z0-9._-]` with `_`.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MediaRef {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<MediaRef> for String {
    fn from(media: MediaRef) -> Self {
        media.0
    }
}

impl AsRef<str> for MediaRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
