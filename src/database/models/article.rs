use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Article lifecycle state. New articles always start as `Draft`; `Archived`
/// is a valid persisted state with no API entry transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
    Archived,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
            ArticleStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ArticleStatus::Draft),
            "published" => Ok(ArticleStatus::Published),
            "archived" => Ok(ArticleStatus::Archived),
            other => Err(format!("unknown article status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Business,
    Political,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Business => "Business",
            Category::Political => "Political",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Technology" => Ok(Category::Technology),
            "Business" => Ok(Category::Business),
            "Political" => Ok(Category::Political),
            "Other" => Ok(Category::Other),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualizationType {
    #[default]
    #[serde(rename = "tableau")]
    Tableau,
    #[serde(rename = "chart.js")]
    ChartJs,
    #[serde(rename = "custom")]
    Custom,
}

fn default_position() -> i32 {
    1
}

/// Embedded dashboard reference. Lives inside the owning article's
/// `visualizations` list; `id` is caller-supplied, `position` is a display
/// ordering hint and does not affect the stored list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualization {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: VisualizationType,
    #[serde(default)]
    pub embed_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_position")]
    pub position: i32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    pub author: String,
    pub featured_image: Option<String>,
    pub seo_meta_description: Option<String>,
    pub seo_keywords: Vec<String>,
    pub status: ArticleStatus,
    pub visualizations: Vec<Visualization>,
    pub views: i64,
    pub likes: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection used by the list endpoints: summary fields only, no content
/// and no visualizations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    pub author: String,
    pub views: i64,
    pub featured_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fully defaulted article ready for insertion. Built by the service from a
/// validated create payload; the store assigns the id and timestamps.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub author: String,
    pub featured_image: Option<String>,
    pub seo_meta_description: String,
    pub seo_keywords: Vec<String>,
    pub visualizations: Vec<Visualization>,
}

/// Field patch for updates. `None` means "leave unchanged"; status and slug
/// are not patchable.
#[derive(Debug, Clone, Default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
    pub featured_image: Option<String>,
    pub seo_meta_description: Option<String>,
    pub seo_keywords: Option<Vec<String>>,
}

fn json_column<T: DeserializeOwned>(row: &PgRow, name: &str) -> Result<T, sqlx::Error> {
    let value: serde_json::Value = row.try_get(name)?;
    serde_json::from_value(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: name.to_string(),
        source: Box::new(e),
    })
}

fn parsed_column<T>(row: &PgRow, name: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.try_get(name)?;
    raw.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: name.to_string(),
        source: e.into(),
    })
}

impl<'r> FromRow<'r, PgRow> for Article {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Article {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            slug: row.try_get("slug")?,
            content: row.try_get("content")?,
            excerpt: row.try_get("excerpt")?,
            category: parsed_column(row, "category")?,
            tags: json_column(row, "tags")?,
            author: row.try_get("author")?,
            featured_image: row.try_get("featured_image")?,
            seo_meta_description: row.try_get("seo_meta_description")?,
            seo_keywords: json_column(row, "seo_keywords")?,
            status: parsed_column(row, "status")?,
            visualizations: json_column(row, "visualizations")?,
            views: row.try_get("views")?,
            likes: row.try_get("likes")?,
            published_at: row.try_get("published_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ArticleSummary {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ArticleSummary {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            slug: row.try_get("slug")?,
            excerpt: row.try_get("excerpt")?,
            category: parsed_column(row, "category")?,
            tags: json_column(row, "tags")?,
            author: row.try_get("author")?,
            views: row.try_get("views")?,
            featured_image: row.try_get("featured_image")?,
            published_at: row.try_get("published_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
