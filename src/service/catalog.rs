use async_trait::async_trait;
use std::sync::Arc;

use super::{CreatedItem, ItemService, NewItem, ServiceError};
use crate::image_store::ImageStore;
use crate::storage::models::ItemView;
use crate::storage::Database;

/// `ItemService` backed by the SQLite catalog and an image store.
pub struct Catalog {
    db: Database,
    images: Arc<dyn ImageStore>,
}

impl Catalog {
    pub fn new(db: Database, images: Arc<dyn ImageStore>) -> Self {
        Self { db, images }
    }
}

#[async_trait]
impl ItemService for Catalog {
    async fn list_all(&self) -> Result<Vec<ItemView>, ServiceError> {
        Ok(self.db.list_items().await?)
    }

    async fn create(&self, item: NewItem) -> Result<CreatedItem, ServiceError> {
        let NewItem {
            name,
            category,
            image,
        } = item;

        if name.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(
                "name must not be empty".to_string(),
            ));
        }
        if category.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(
                "category must not be empty".to_string(),
            ));
        }

        tracing::info!(name = %name, category = %category, "Receive item");

        // The blob is written first; if a later step fails it is left behind,
        // which is harmless since its name only depends on its content.
        let image_filename = self.images.store(image).await?;
        let category_id = self.db.find_or_create_category(&category).await?;
        let id = self
            .db
            .insert_item(&name, category_id, &image_filename)
            .await?;

        tracing::debug!(item_id = id, category_id, image = %image_filename, "Created item");

        Ok(CreatedItem {
            message: format!("item received: {name}"),
            id,
            image_filename,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<ItemView, ServiceError> {
        self.db
            .get_item(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("item {id} not found")))
    }

    async fn search(&self, keyword: &str) -> Result<Vec<ItemView>, ServiceError> {
        Ok(self.db.search_items(keyword).await?)
    }
}
