//! item-listing - A marketplace listing API
//!
//! This crate stores and serves marketplace items with:
//! - Content-addressed image storage (SHA-256 named files on local disk)
//! - SQLite catalog of items and lazily created categories, via a sqlx pool
//! - REST API with multipart item submission and keyword search

pub mod api;
pub mod config;
pub mod image_store;
pub mod service;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use config::Config;
use image_store::ImageStore;
use service::ItemService;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub images: Arc<dyn ImageStore>,
    pub items: Arc<dyn ItemService>,
}
