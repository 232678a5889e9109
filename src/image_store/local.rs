use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

use super::{
    content_filename, validate_filename, ImageStore, ImageStoreError, StoredImage, DEFAULT_IMAGE,
};

/// Image store backed by a local directory.
pub struct LocalImageStore {
    base_path: PathBuf,
}

impl LocalImageStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;

        if !base_path.join(DEFAULT_IMAGE).exists() {
            tracing::warn!(
                path = %base_path.display(),
                "No {DEFAULT_IMAGE} placeholder in image directory; missing images will fail"
            );
        }

        Ok(Self { base_path })
    }

    fn image_path(&self, filename: &str) -> PathBuf {
        self.base_path.join(filename)
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, data: Bytes) -> Result<String, ImageStoreError> {
        let filename = content_filename(&data);
        tokio::fs::write(self.image_path(&filename), &data).await?;
        tracing::debug!(filename = %filename, bytes = data.len(), "Stored image");
        Ok(filename)
    }

    async fn resolve(&self, filename: &str) -> Result<StoredImage, ImageStoreError> {
        validate_filename(filename)?;

        let mut path = self.image_path(filename);
        let mut is_default = false;
        if !tokio::fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "Image not found, serving placeholder");
            path = self.image_path(DEFAULT_IMAGE);
            is_default = true;
        }

        let file = tokio::fs::File::open(&path).await?;
        let byte_size = file.metadata().await?.len();

        Ok(StoredImage {
            filename: if is_default {
                DEFAULT_IMAGE.to_string()
            } else {
                filename.to_string()
            },
            file,
            byte_size,
            is_default,
        })
    }
}
