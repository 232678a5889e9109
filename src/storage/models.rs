use serde::{Deserialize, Serialize};

/// A row of the `category` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// An item joined with its category name, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemView {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub image_filename: String,
}
