use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{parse_id, ApiError, AppQuery};
use crate::service::{CreatedItem, NewItem};
use crate::storage::models::ItemView;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<ItemView>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let items = state.items.list_all().await?;
    Ok(Json(ItemsResponse { items }))
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<CreatedItem>, ApiError> {
    let mut name: Option<String> = None;
    let mut category: Option<String> = None;
    let mut image: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart data", e))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "name" => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error("Invalid name", e))?,
                );
            }
            "category" => {
                category = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error("Invalid category", e))?,
                );
            }
            "image" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Failed to read image", e))?;

                if data.len() as u64 > state.config.max_upload_size {
                    return Err(ApiError::payload_too_large(format!(
                        "Image exceeds maximum upload size of {} bytes",
                        state.config.max_upload_size
                    )));
                }

                image = Some(data);
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let name = name.ok_or_else(|| ApiError::bad_request("name field is required"))?;
    let category = category.ok_or_else(|| ApiError::bad_request("category field is required"))?;
    let image = image.ok_or_else(|| ApiError::bad_request("image field is required"))?;

    let created = state
        .items
        .create(NewItem {
            name,
            category,
            image,
        })
        .await?;

    Ok(Json(created))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ItemView>, ApiError> {
    let id = parse_id(&id)?;
    let item = state.items.get_by_id(id).await?;
    Ok(Json(item))
}

pub async fn search_items(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<SearchParams>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let items = state.items.search(&params.keyword).await?;
    Ok(Json(ItemsResponse { items }))
}

// ============================================================================
// Helpers
// ============================================================================

/// Map a multipart read failure, keeping the body-limit case distinct from malformed input.
fn multipart_error(context: &str, e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(format!("{context}: request body is too large"))
    } else {
        ApiError::bad_request(format!("{context}: {}", e.body_text()))
    }
}
