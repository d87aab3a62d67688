//! Core listing types.
//!
//! These types enforce the record invariants at construction time:
//! ids are never empty, statuses are always one of the two known values,
//! and media references cannot name a path outside the uploads directory.

mod item;
mod item_id;
mod media;
mod status;

pub use item::{DeletedItem, Item, NewItem};
pub use item_id::ItemId;
pub use media::{ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES, MediaRef, MediaUpload};
pub use status::ItemStatus;
