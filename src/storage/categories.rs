use super::db::{Database, DatabaseError};
use super::models::Category;

impl Database {
    // ========================================================================
    // Category operations
    // ========================================================================

    /// Return the id of the category called `name`, creating it if needed.
    ///
    /// Two requests may both miss the lookup and race to insert the same
    /// name. The loser hits the UNIQUE constraint and re-reads the winner's row.
    pub async fn find_or_create_category(&self, name: &str) -> Result<i64, DatabaseError> {
        if let Some(id) = self.category_id(name).await? {
            return Ok(id);
        }

        let inserted = sqlx::query("INSERT INTO category (name) VALUES (?)")
            .bind(name)
            .execute(self.pool())
            .await;

        match inserted {
            Ok(result) => {
                let id = result.last_insert_rowid();
                tracing::debug!(category_id = id, category = %name, "Created category");
                Ok(id)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::debug!(category = %name, "Category created concurrently, re-reading");
                self.category_id(name)
                    .await?
                    .ok_or(DatabaseError::Sqlx(sqlx::Error::RowNotFound))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a category id by its unique name
    pub async fn category_id(&self, name: &str) -> Result<Option<i64>, DatabaseError> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM category WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;
        Ok(id)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let rows = sqlx::query_as::<_, Category>("SELECT id, name FROM category ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }
}
