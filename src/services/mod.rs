//! External collaborators.

pub mod blob;

pub use blob::BlobClient;
