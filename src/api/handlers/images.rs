use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::api::response::ApiError;
use crate::AppState;

/// Stream an image by filename, or the placeholder if it is not stored.
/// Route: GET /images/:filename
pub async fn serve_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let image = state.images.resolve(&filename).await?;

    let mime_type = mime_guess::from_path(&image.filename).first_or_octet_stream();
    let body = Body::from_stream(ReaderStream::new(image.file));

    let mut response = (StatusCode::OK, body).into_response();
    let headers = response.headers_mut();

    if let Ok(value) = mime_type.as_ref().parse() {
        headers.insert(header::CONTENT_TYPE, value);
    }

    headers.insert(
        header::CONTENT_LENGTH,
        header::HeaderValue::from(image.byte_size),
    );

    // Stored images never change under their name; the placeholder stands in for
    // a name that may be uploaded later, so it must not be cached.
    let cache_control = if image.is_default {
        "no-cache"
    } else {
        "public, max-age=31536000, immutable"
    };
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static(cache_control),
    );

    Ok(response)
}
