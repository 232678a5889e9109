mod local;

pub use local::LocalImageStore;

use async_trait::async_trait;
use bytes::Bytes;
use ring::digest::{digest, SHA256};
use std::path::{Component, Path};
use thiserror::Error;

/// Extension every stored and served image carries.
pub const IMAGE_EXTENSION: &str = ".jpg";

/// Placeholder served when a requested image is missing.
pub const DEFAULT_IMAGE: &str = "default.jpg";

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid image filename: {0}")]
    InvalidFilename(String),
}

/// An opened image ready to be streamed back to a client.
#[derive(Debug)]
pub struct StoredImage {
    pub filename: String,
    pub file: tokio::fs::File,
    pub byte_size: u64,
    /// True when the requested image was missing and the placeholder was opened instead.
    pub is_default: bool,
}

/// Content-addressed image storage.
/// Filenames are a pure function of the bytes, so storing the same image twice is a no-op.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `data` and return the filename it is stored under.
    async fn store(&self, data: Bytes) -> Result<String, ImageStoreError>;
    /// Open a stored image, falling back to the placeholder when it does not exist.
    async fn resolve(&self, filename: &str) -> Result<StoredImage, ImageStoreError>;
}

/// `<sha256-hex>.jpg` for the given bytes.
pub fn content_filename(data: &[u8]) -> String {
    let hash = digest(&SHA256, data);
    format!("{}{IMAGE_EXTENSION}", hex::encode(hash.as_ref()))
}

/// Reject names that are not `.jpg` or that could escape the image directory.
pub fn validate_filename(filename: &str) -> Result<(), ImageStoreError> {
    if !filename.ends_with(IMAGE_EXTENSION) {
        return Err(ImageStoreError::InvalidFilename(format!(
            "Image path does not end with {IMAGE_EXTENSION}"
        )));
    }
    let mut components = Path::new(filename).components();
    let single_name = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if filename.contains('\0') || !single_name {
        return Err(ImageStoreError::InvalidFilename(
            "Image path must be a plain file name".to_string(),
        ));
    }
    Ok(())
}
