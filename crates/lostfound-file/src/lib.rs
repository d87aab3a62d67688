//! lostfound-file - Filesystem-backed record and media storage.

mod data_dir;
mod media;
mod store;

pub use data_dir::DataDir;
pub use media::MediaDir;
pub use store::FileItemStore;
