//! lostfound-core - Core types and traits for the lost-and-found listing service.

pub mod error;
pub mod traits;
pub mod types;

pub use error::Error;
pub use traits::{ItemStore, MediaStore};
pub use types::{
    DeletedItem, Item, ItemId, ItemStatus, MediaRef, MediaUpload, NewItem, ALLOWED_IMAGE_TYPES,
    MAX_IMAGE_BYTES,
};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
