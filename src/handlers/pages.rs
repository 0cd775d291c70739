use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;
use tera::Context;

use crate::config;
use crate::middleware::response::Pagination;
use crate::render::{render, render_error_page};
use crate::services::article_service::ArticleError;
use crate::services::ArticleService;

/// GET / - home page with the feedback form
pub async fn home() -> Response {
    let mut context = Context::new();
    context.insert("message", &Option::<&str>::None);
    context.insert("error", &Option::<&str>::None);
    render("index.html", &context)
}

/// GET /request - the story-request form page
pub async fn request_form() -> Response {
    let mut context = Context::new();
    context.insert("message", &Option::<&str>::None);
    context.insert("error", &Option::<&str>::None);
    render("request.html", &context)
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// GET /articles - published article list page
pub async fn article_list(Query(query): Query<PageQuery>) -> Response {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = config::config().pagination.page_size;

    let listed = match ArticleService::new().await {
        Ok(service) => service.list_published(page, page_size).await,
        Err(e) => Err(e),
    };

    match listed {
        Ok((articles, total)) => {
            let mut context = Context::new();
            context.insert("articles", &articles);
            context.insert("pagination", &Pagination::new(page, page_size, total));
            render("articles.html", &context)
        }
        Err(e) => {
            tracing::error!("Error loading articles page: {}", e);
            render_error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load articles",
                "Please try again later.",
            )
        }
    }
}

/// GET /articles/:slug - article detail page; viewing counts a view
pub async fn article_detail(Path(slug): Path<String>) -> Response {
    let fetched = match ArticleService::new().await {
        Ok(service) => service.get_by_slug(&slug).await,
        Err(e) => Err(e),
    };

    match fetched {
        Ok(article) => {
            let mut context = Context::new();
            context.insert("article", &article);
            render("article.html", &context)
        }
        Err(ArticleError::NotFound) => render_error_page(
            StatusCode::NOT_FOUND,
            "Article not found",
            "The article you're looking for doesn't exist.",
        ),
        Err(e) => {
            tracing::error!("Error loading article page: {}", e);
            render_error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load article",
                "Please try again later.",
            )
        }
    }
}
