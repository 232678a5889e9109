use super::db::{Database, DatabaseError};
use super::models::ItemView;

const SELECT_ITEM_VIEW: &str = "SELECT items.id, items.name, category.name AS category, \
     items.image_filename \
     FROM items JOIN category ON category.id = items.category_id";

impl Database {
    // ========================================================================
    // Item operations
    // ========================================================================

    /// Insert an item row and return its id. `category_id` must reference an existing category.
    pub async fn insert_item(
        &self,
        name: &str,
        category_id: i64,
        image_filename: &str,
    ) -> Result<i64, DatabaseError> {
        let result =
            sqlx::query("INSERT INTO items (name, category_id, image_filename) VALUES (?, ?, ?)")
                .bind(name)
                .bind(category_id)
                .bind(image_filename)
                .execute(self.pool())
                .await?;
        Ok(result.last_insert_rowid())
    }

    /// All items in insertion order
    pub async fn list_items(&self) -> Result<Vec<ItemView>, DatabaseError> {
        let rows = sqlx::query_as::<_, ItemView>(&format!("{SELECT_ITEM_VIEW} ORDER BY items.id"))
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }

    pub async fn get_item(&self, id: i64) -> Result<Option<ItemView>, DatabaseError> {
        let row = sqlx::query_as::<_, ItemView>(&format!("{SELECT_ITEM_VIEW} WHERE items.id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }

    /// Items whose name contains `keyword` (case-sensitive). An empty keyword matches everything.
    pub async fn search_items(&self, keyword: &str) -> Result<Vec<ItemView>, DatabaseError> {
        let rows = sqlx::query_as::<_, ItemView>(&format!(
            "{SELECT_ITEM_VIEW} WHERE instr(items.name, ?) > 0 ORDER BY items.id"
        ))
        .bind(keyword)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
