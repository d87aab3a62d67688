//! Core traits for record storage and media storage.

mod media;
mod store;

pub use media::MediaStore;
pub use store::ItemStore;
