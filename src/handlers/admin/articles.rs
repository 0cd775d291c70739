use axum::extract::{Path, Query};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config;
use crate::database::models::Article;
use crate::error::ApiError;
use crate::middleware::auth::AdminGate;
use crate::middleware::response::{ApiResponse, ApiResult, Pagination};
use crate::sanitize::sanitize_html;
use crate::services::{ArticleService, CreateArticle, UpdateArticle};
use crate::validate::{validate, CREATE_ARTICLE_RULES, UPDATE_ARTICLE_RULES};

/// Sanitize the free-text HTML field before the payload is deserialized.
/// Other fields are length-checked but stored verbatim.
fn sanitize_content_field(mut payload: Value) -> Value {
    if let Some(content) = payload.get("content").and_then(Value::as_str) {
        let clean = sanitize_html(content);
        payload["content"] = Value::String(clean);
    }
    payload
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
}

/// POST /api/articles - create a draft article (admin)
pub async fn create(_gate: AdminGate, Json(payload): Json<Value>) -> ApiResult<Article> {
    validate(CREATE_ARTICLE_RULES, &payload)?;
    let payload = sanitize_content_field(payload);
    let input: CreateArticle = decode(payload)?;

    let service = ArticleService::new().await?;
    let article = service.create(input).await?;

    Ok(ApiResponse::created(article).with_message("Article created successfully"))
}

#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// GET /api/articles-admin/all - every article, any status (admin)
pub async fn list_all(
    _gate: AdminGate,
    Query(query): Query<AdminListQuery>,
) -> ApiResult<Vec<Article>> {
    let pagination = &config::config().pagination;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(pagination.default_limit)
        .clamp(1, pagination.max_limit);

    let service = ArticleService::new().await?;
    let (articles, total) = service
        .list_all(query.status.as_deref(), page, limit)
        .await?;

    Ok(ApiResponse::success(articles).with_pagination(Pagination::new(page, limit, total)))
}

/// PUT /api/articles/:id - patch supplied fields (admin). A client-supplied
/// `status` is discarded before the payload is decoded.
pub async fn update(
    _gate: AdminGate,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<Value>,
) -> ApiResult<Article> {
    validate(UPDATE_ARTICLE_RULES, &payload)?;
    if let Some(object) = payload.as_object_mut() {
        object.remove("status");
    }
    let payload = sanitize_content_field(payload);
    let input: UpdateArticle = decode(payload)?;

    let service = ArticleService::new().await?;
    let article = service.update(id, input).await?;

    Ok(ApiResponse::success(article).with_message("Article updated successfully"))
}

/// POST /api/articles/:id/publish (admin)
pub async fn publish(_gate: AdminGate, Path(id): Path<Uuid>) -> ApiResult<Article> {
    let service = ArticleService::new().await?;
    let article = service.publish(id).await?;
    Ok(ApiResponse::success(article).with_message("Article published successfully"))
}

/// POST /api/articles/:id/unpublish (admin)
pub async fn unpublish(_gate: AdminGate, Path(id): Path<Uuid>) -> ApiResult<Article> {
    let service = ArticleService::new().await?;
    let article = service.unpublish(id).await?;
    Ok(ApiResponse::success(article).with_message("Article unpublished successfully"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedArticle {
    pub deleted_id: Uuid,
}

/// DELETE /api/articles/:id - hard delete (admin)
pub async fn remove(_gate: AdminGate, Path(id): Path<Uuid>) -> ApiResult<DeletedArticle> {
    let service = ArticleService::new().await?;
    let deleted_id = service.delete(id).await?;
    Ok(ApiResponse::success(DeletedArticle { deleted_id })
        .with_message("Article deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_field_is_sanitized_in_place() {
        let payload = json!({
            "title": "A fine title",
            "content": "<script>alert(1)</script><p>hello</p>",
        });
        let clean = sanitize_content_field(payload);
        assert_eq!(clean["content"], "<p>hello</p>");
        assert_eq!(clean["title"], "A fine title");
    }

    #[test]
    fn payload_without_content_untouched() {
        let payload = json!({ "title": "A fine title" });
        let clean = sanitize_content_field(payload.clone());
        assert_eq!(clean, payload);
    }

    #[test]
    fn update_payload_drops_status_before_decode() {
        let mut payload = json!({ "title": "New title here", "status": "published" });
        if let Some(object) = payload.as_object_mut() {
            object.remove("status");
        }
        let input: UpdateArticle = decode(payload).unwrap();
        assert_eq!(input.title.as_deref(), Some("New title here"));
    }
}
