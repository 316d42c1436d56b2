//! Storage module for uploaded files
//!
//! Provides a local-disk store that writes request photos into the uploads
//! directory under collision-free generated names.

mod local_storage;

pub use local_storage::{LocalStorage, StoredFile};
