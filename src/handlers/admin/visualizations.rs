use axum::extract::Path;
use axum::Json;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::Article;
use crate::error::ApiError;
use crate::middleware::auth::AdminGate;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::article_service::{build_visualization, NewVisualization};
use crate::services::ArticleService;

/// POST /api/articles/:id/visualizations - append an embedded dashboard
/// reference (admin). `vizId` and `embedUrl` are required.
pub async fn add(
    _gate: AdminGate,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> ApiResult<Article> {
    let input: NewVisualization = serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?;
    let visualization =
        build_visualization(input).ok_or_else(|| ApiError::bad_request("vizId and embedUrl are required"))?;

    let service = ArticleService::new().await?;
    let article = service.add_visualization(id, visualization).await?;

    Ok(ApiResponse::success(article).with_message("Visualization added successfully"))
}

/// DELETE /api/articles/:id/visualizations/:vizId (admin). Removing an id
/// that is not in the list is a success and leaves the article unchanged.
pub async fn remove(
    _gate: AdminGate,
    Path((id, viz_id)): Path<(Uuid, String)>,
) -> ApiResult<Article> {
    let service = ArticleService::new().await?;
    let article = service.remove_visualization(id, &viz_id).await?;
    Ok(ApiResponse::success(article).with_message("Visualization removed successfully"))
}
