use axum::extract::{Path, Query};
use serde::Deserialize;

use crate::config;
use crate::database::models::{Article, ArticleSummary};
use crate::middleware::response::{ApiResponse, ApiResult, Pagination};
use crate::services::ArticleService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/articles - published articles, paginated summaries
pub async fn list(Query(query): Query<ListQuery>) -> ApiResult<Vec<ArticleSummary>> {
    let pagination = &config::config().pagination;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(pagination.default_limit)
        .clamp(1, pagination.max_limit);

    let service = ArticleService::new().await?;
    let (articles, total) = service.list_published(page, limit).await?;

    Ok(ApiResponse::success(articles).with_pagination(Pagination::new(page, limit, total)))
}

/// GET /api/articles/:slug - single published article; the fetch counts a view
pub async fn by_slug(Path(slug): Path<String>) -> ApiResult<Article> {
    let service = ArticleService::new().await?;
    let article = service.get_by_slug(&slug).await?;
    Ok(ApiResponse::success(article))
}

/// GET /api/articles/category/:category - published articles in one category
pub async fn by_category(Path(category): Path<String>) -> ApiResult<Vec<ArticleSummary>> {
    let service = ArticleService::new().await?;
    let articles = service.list_by_category(&category).await?;
    Ok(ApiResponse::success(articles))
}
