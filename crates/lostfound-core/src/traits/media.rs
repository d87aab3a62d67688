//! Media storage trait.

use async_trait::async_trait;

use crate::Result;
use crate::types::{MediaRef, MediaUpload};

/// Storage for uploaded item images.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Check and persist an upload, returning the name it was stored under.
    async fn store(&self, upload: MediaUpload) -> Result<MediaRef>;

    /// Delete a stored file. A file that is already gone is not an error.
    async fn remove(&self, media: &MediaRef) -> Result<()>;
}
