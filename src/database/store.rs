use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Article, ArticlePatch, ArticleStatus, ArticleSummary, NewArticle, Visualization};

/// Errors surfaced by the store adapters. Everything except `DuplicateSlug`
/// is an opaque persistence failure the caller maps to a generic 500.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate slug")]
    DuplicateSlug,

    #[error("failed to encode document field: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const SUMMARY_COLUMNS: &str =
    "id, title, slug, excerpt, category, tags, author, views, featured_image, published_at, created_at";

/// Document-style access to the `articles` collection: equality filters,
/// sort, skip/limit, array push/pull on the embedded visualization list, and
/// update-returning. All single-row writes are atomic at the store level.
#[derive(Clone)]
pub struct ArticleStore {
    pool: PgPool,
}

impl ArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, article: NewArticle) -> Result<Article, StoreError> {
        let id = Uuid::new_v4();
        let tags = serde_json::to_value(&article.tags)?;
        let seo_keywords = serde_json::to_value(&article.seo_keywords)?;
        let visualizations = serde_json::to_value(&article.visualizations)?;

        let inserted = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles
                (id, title, slug, content, excerpt, category, tags, author,
                 featured_image, seo_meta_description, seo_keywords, status, visualizations)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'draft', $12)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.content)
        .bind(&article.excerpt)
        .bind(article.category.as_str())
        .bind(&tags)
        .bind(&article.author)
        .bind(&article.featured_image)
        .bind(&article.seo_meta_description)
        .bind(&seo_keywords)
        .bind(&visualizations)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(inserted)
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM articles WHERE slug = $1)")
                .bind(slug)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Published-article page, newest publish first.
    pub async fn list_published(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ArticleSummary>, StoreError> {
        let sql = format!(
            r#"
            SELECT {SUMMARY_COLUMNS}
            FROM articles
            WHERE status = 'published'
            ORDER BY published_at DESC NULLS LAST
            OFFSET $1 LIMIT $2
            "#,
        );
        let rows = sqlx::query_as::<_, ArticleSummary>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count_published(&self) -> Result<i64, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE status = 'published'")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn list_published_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<ArticleSummary>, StoreError> {
        let sql = format!(
            r#"
            SELECT {SUMMARY_COLUMNS}
            FROM articles
            WHERE status = 'published' AND category = $1
            ORDER BY published_at DESC NULLS LAST
            "#,
        );
        let rows = sqlx::query_as::<_, ArticleSummary>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Fetch a published article by slug, bumping its view counter in the
    /// same statement. The increment rides on the row update, so concurrent
    /// readers cannot lose counts.
    pub async fn find_published_by_slug_counting_view(
        &self,
        slug: &str,
    ) -> Result<Option<Article>, StoreError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET views = views + 1
            WHERE slug = $1 AND status = 'published'
            RETURNING *
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(article)
    }

    /// All-status page for the admin listing, newest creation first. An
    /// absent status filter matches every row.
    pub async fn list_all(
        &self,
        status: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Article>, StoreError> {
        let rows = sqlx::query_as::<_, Article>(
            r#"
            SELECT *
            FROM articles
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(status)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_all(&self, status: Option<&str>) -> Result<i64, StoreError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM articles WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Patch supplied fields only; absent fields keep their stored value.
    pub async fn update_fields(
        &self,
        id: Uuid,
        patch: ArticlePatch,
    ) -> Result<Option<Article>, StoreError> {
        let tags = patch.tags.as_ref().map(serde_json::to_value).transpose()?;
        let seo_keywords = patch
            .seo_keywords
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET title                = COALESCE($2, title),
                content              = COALESCE($3, content),
                excerpt              = COALESCE($4, excerpt),
                category             = COALESCE($5, category),
                tags                 = COALESCE($6, tags),
                author               = COALESCE($7, author),
                featured_image       = COALESCE($8, featured_image),
                seo_meta_description = COALESCE($9, seo_meta_description),
                seo_keywords         = COALESCE($10, seo_keywords),
                updated_at           = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.content)
        .bind(patch.excerpt)
        .bind(patch.category.map(|c| c.as_str()))
        .bind(tags)
        .bind(patch.author)
        .bind(patch.featured_image)
        .bind(patch.seo_meta_description)
        .bind(seo_keywords)
        .fetch_optional(&self.pool)
        .await?;
        Ok(article)
    }

    /// Status transition. `stamp_published_at` refreshes `published_at`
    /// (publish); otherwise the existing timestamp is left untouched, so it
    /// records the most recent publish time rather than "currently published".
    pub async fn set_status(
        &self,
        id: Uuid,
        status: ArticleStatus,
        stamp_published_at: bool,
    ) -> Result<Option<Article>, StoreError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET status       = $2,
                published_at = CASE WHEN $3 THEN now() ELSE published_at END,
                updated_at   = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(stamp_published_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(article)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let deleted: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM articles WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(deleted)
    }

    /// Append to the embedded visualization list in one statement.
    pub async fn push_visualization(
        &self,
        id: Uuid,
        visualization: &Visualization,
    ) -> Result<Option<Article>, StoreError> {
        let element = serde_json::to_value(vec![visualization])?;
        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET visualizations = visualizations || $2::jsonb,
                updated_at     = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&element)
        .fetch_optional(&self.pool)
        .await?;
        Ok(article)
    }

    /// Remove every embedded entry whose `id` matches. Removing an id that is
    /// not present leaves the list unchanged and still returns the article.
    pub async fn pull_visualization(
        &self,
        id: Uuid,
        viz_id: &str,
    ) -> Result<Option<Article>, StoreError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET visualizations = COALESCE(
                    (SELECT jsonb_agg(v)
                     FROM jsonb_array_elements(visualizations) AS v
                     WHERE v->>'id' <> $2),
                    '[]'::jsonb
                ),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(viz_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(article)
    }
}

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::DuplicateSlug;
        }
    }
    StoreError::Sqlx(err)
}

/// Single-record inserts for the two lead-capture collections.
#[derive(Clone)]
pub struct LeadStore {
    pool: PgPool,
}

impl LeadStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_feedback(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO feedback_user (id, name, email, message) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(email)
            .bind(message)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn insert_request(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO request_user (id, name, email, message) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(email)
            .bind(message)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
