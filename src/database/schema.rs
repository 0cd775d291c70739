use sqlx::PgPool;
use tracing::info;

/// Startup schema bootstrap. Statements are idempotent; there is no offline
/// migration tooling. The unique index on `slug` is the storage-level
/// backstop for the application's check-then-insert: two concurrent creates
/// that derive the same slug cannot both commit.
const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id                   UUID PRIMARY KEY,
        title                TEXT NOT NULL,
        slug                 TEXT NOT NULL,
        content              TEXT NOT NULL,
        excerpt              TEXT,
        category             TEXT NOT NULL DEFAULT 'Other',
        tags                 JSONB NOT NULL DEFAULT '[]'::jsonb,
        author               TEXT NOT NULL DEFAULT 'NITE Team',
        featured_image       TEXT,
        seo_meta_description TEXT,
        seo_keywords         JSONB NOT NULL DEFAULT '[]'::jsonb,
        status               TEXT NOT NULL DEFAULT 'draft',
        visualizations       JSONB NOT NULL DEFAULT '[]'::jsonb,
        views                BIGINT NOT NULL DEFAULT 0,
        likes                BIGINT NOT NULL DEFAULT 0,
        published_at         TIMESTAMPTZ,
        created_at           TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at           TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS articles_slug_key ON articles (slug)",
    "CREATE INDEX IF NOT EXISTS articles_status_published_at_idx ON articles (status, published_at DESC)",
    "CREATE INDEX IF NOT EXISTS articles_category_idx ON articles (category)",
    r#"
    CREATE TABLE IF NOT EXISTS feedback_user (
        id         UUID PRIMARY KEY,
        name       TEXT NOT NULL,
        email      TEXT NOT NULL,
        message    TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS request_user (
        id         UUID PRIMARY KEY,
        name       TEXT NOT NULL,
        email      TEXT NOT NULL,
        message    TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in DDL {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}
