//! Shared test helpers for in-crate router tests.

use std::sync::Arc;

use crate::config::{Config, StorageConfig};
use crate::image_store::{LocalImageStore, DEFAULT_IMAGE};
use crate::service::Catalog;
use crate::storage::Database;
use crate::AppState;

/// Stand-in bytes for the placeholder image.
pub const DEFAULT_IMAGE_BYTES: &[u8] = b"default placeholder image";

/// Create a test AppState with a temporary catalog and image directory.
pub async fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    test_state_with_upload_limit(temp_dir, Config::default().max_upload_size).await
}

/// Same as [`test_state`], with a custom image size cap.
pub async fn test_state_with_upload_limit(
    temp_dir: &tempfile::TempDir,
    max_upload_size: u64,
) -> Arc<AppState> {
    let data_dir = temp_dir.path().join("data");
    let images_dir = temp_dir.path().join("images");

    let config = Config {
        storage: StorageConfig {
            data_dir: data_dir.to_string_lossy().to_string(),
            images_dir: images_dir.to_string_lossy().to_string(),
            max_connections: 5,
        },
        max_upload_size,
        ..Default::default()
    };

    std::fs::create_dir_all(&images_dir).expect("Failed to create test image directory");
    std::fs::write(images_dir.join(DEFAULT_IMAGE), DEFAULT_IMAGE_BYTES)
        .expect("Failed to write placeholder image");

    let db = Database::open(&data_dir, config.storage.max_connections)
        .await
        .expect("Failed to open test database");
    let images = Arc::new(LocalImageStore::new(&images_dir).expect("Failed to create image store"));
    let items = Arc::new(Catalog::new(db, images.clone()));

    Arc::new(AppState {
        config,
        images,
        items,
    })
}
