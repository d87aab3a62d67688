//! Item record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ItemId, ItemStatus};
use crate::Result;
use crate::error::ValidationError;

/// A single lost/found listing.
///
/// Serialized with camelCase keys; this is both the HTTP response shape and
/// the on-disk snapshot format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique, immutable identifier.
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub contact: String,
    /// Where the item was lost or found; empty if not given.
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: ItemStatus,
    /// Absolute URL of the attached image; empty if none.
    #[serde(default)]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    /// Set on every status change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Whether an image is attached.
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }

    /// The stored media filename, taken from the last path segment of the
    /// image URL.
    pub fn image_filename(&self) -> Option<&str> {
        if !self.has_image() {
            return None;
        }
        self.image_url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    pub fn is_resolved(&self) -> bool {
        self.status == ItemStatus::Resolved
    }
}

/// A validated submission for a new item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub contact: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewItem {
    /// Create a submission with the three required fields.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            contact: contact.into(),
            location: None,
            image_url: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Whether any required field is empty after trimming.
    pub fn is_missing_fields(&self) -> bool {
        [&self.title, &self.description, &self.contact]
            .iter()
            .any(|field| field.trim().is_empty())
    }

    /// Trim every field and check that title, description and contact are
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFields`] if any required field is
    /// empty after trimming.
    pub fn validated(self) -> Result<Self> {
        if self.is_missing_fields() {
            return Err(ValidationError::MissingFields.into());
        }

        Ok(Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            contact: self.contact.trim().to_string(),
            location: self.location.map(|l| l.trim().to_string()),
            image_url: self.image_url.filter(|url| !url.is_empty()),
        })
    }

    /// Build the stored record.
    pub fn into_item(self, id: ItemId, created_at: DateTime<Utc>) -> Item {
        Item {
            id,
            title: self.title,
            description: self.description,
            contact: self.contact,
            location: self.location.unwrap_or_default(),
            status: ItemStatus::Active,
            image_url: self.image_url.unwrap_or_default(),
            created_at,
            updated_at: None,
        }
    }
}

/// Confirmation returned after a deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedItem {
    pub message: String,
    pub deleted_id: ItemId,
}

impl DeletedItem {
    pub fn new(deleted_id: ItemId) -> Self {
        Self {
            message: "Item deleted successfully".to_string(),
            deleted_id,
        }
    }
}
