//! Item service: the contract the HTTP layer talks to, and its catalog-backed implementation.

mod catalog;

pub use catalog::Catalog;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

use crate::image_store::ImageStoreError;
use crate::storage::models::ItemView;
use crate::storage::DatabaseError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Image(#[from] ImageStoreError),
}

/// A listing submission.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub image: Bytes,
}

/// Confirmation returned after an item is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedItem {
    pub message: String,
    pub id: i64,
    pub image_filename: String,
}

#[async_trait]
pub trait ItemService: Send + Sync {
    async fn list_all(&self) -> Result<Vec<ItemView>, ServiceError>;
    async fn create(&self, item: NewItem) -> Result<CreatedItem, ServiceError>;
    async fn get_by_id(&self, id: i64) -> Result<ItemView, ServiceError>;
    async fn search(&self, keyword: &str) -> Result<Vec<ItemView>, ServiceError>;
}
