//! TSV persistence for scraped links: daily files, merge/dedup, rotation,
//! and incremental export to object storage.

pub mod backend;
pub mod error;
pub mod export;
pub mod rotate;
pub mod tsv;

pub use backend::{LocalBackend, S3Backend, StorageBackend};
pub use error::StorageError;
pub use export::TsvExporter;
pub use rotate::rotate_if_large;
pub use tsv::TsvStore;
