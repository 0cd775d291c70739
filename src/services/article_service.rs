use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::{DatabaseManager, DatabaseError};
use crate::database::models::{
    Article, ArticlePatch, ArticleStatus, ArticleSummary, Category, NewArticle, Visualization,
    VisualizationType,
};
use crate::database::store::{ArticleStore, StoreError};

const DEFAULT_AUTHOR: &str = "NITE Team";
const EXCERPT_DEFAULT_CHARS: usize = 150;
const SEO_DESCRIPTION_DEFAULT_CHARS: usize = 160;
const SLUG_MAX_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("article not found")]
    NotFound,
    #[error("an article with this slug already exists")]
    DuplicateSlug,
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ArticleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateSlug => ArticleError::DuplicateSlug,
            other => ArticleError::Store(other),
        }
    }
}

/// Validated create payload. `status` is not accepted here: new articles
/// always start as drafts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticle {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub visualizations: Option<Vec<Visualization>>,
    #[serde(default)]
    pub seo_meta_description: Option<String>,
    #[serde(default)]
    pub seo_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub featured_image: Option<String>,
}

/// Validated update payload: patch semantics, every field optional. `status`
/// and `slug` are not part of this type and can never change through update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub seo_meta_description: Option<String>,
    #[serde(default)]
    pub seo_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub featured_image: Option<String>,
}

/// Visualization-add payload; `viz_id` and `embed_url` are required and
/// checked by the handler before the service is called.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisualization {
    #[serde(default)]
    pub viz_id: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<VisualizationType>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Owns the article entity's invariants: slug derivation and uniqueness,
/// status transitions, default fills, and the embedded visualization list.
pub struct ArticleService {
    store: ArticleStore,
}

impl ArticleService {
    pub async fn new() -> Result<Self, ArticleError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self {
            store: ArticleStore::new(pool),
        })
    }

    /// Published articles, newest publish first, as a page of summaries.
    pub async fn list_published(
        &self,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<ArticleSummary>, i64), ArticleError> {
        let offset = (page - 1) * limit;
        let articles = self.store.list_published(offset, limit).await?;
        let total = self.store.count_published().await?;
        Ok((articles, total))
    }

    /// Published article by slug. The fetch itself bumps the view counter;
    /// a miss (unknown slug or not published) is NotFound.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Article, ArticleError> {
        self.store
            .find_published_by_slug_counting_view(slug)
            .await?
            .ok_or(ArticleError::NotFound)
    }

    pub async fn list_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<ArticleSummary>, ArticleError> {
        Ok(self.store.list_published_by_category(category).await?)
    }

    /// Admin listing across all statuses, newest creation first. The status
    /// filter is passed through verbatim; unknown values match nothing.
    pub async fn list_all(
        &self,
        status: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Article>, i64), ArticleError> {
        let offset = (page - 1) * limit;
        let articles = self.store.list_all(status, offset, limit).await?;
        let total = self.store.count_all(status).await?;
        Ok((articles, total))
    }

    /// Create a draft article. The slug is derived from the title exactly
    /// once, here; the pre-insert existence check gives the friendly error
    /// and the store's unique index backstops the race.
    pub async fn create(&self, input: CreateArticle) -> Result<Article, ArticleError> {
        let slug = slugify(&input.title);
        if self.store.slug_exists(&slug).await? {
            return Err(ArticleError::DuplicateSlug);
        }
        let article = assemble_new_article(input, slug);
        Ok(self.store.insert(article).await?)
    }

    /// Patch supplied fields. The slug is never recomputed, even when the
    /// title changes.
    pub async fn update(&self, id: Uuid, input: UpdateArticle) -> Result<Article, ArticleError> {
        let patch = ArticlePatch {
            title: input.title.map(|s| s.trim().to_string()),
            content: input.content.map(|s| s.trim().to_string()),
            excerpt: input.excerpt.map(|s| s.trim().to_string()),
            category: input.category,
            tags: input.tags,
            author: input.author.map(|s| s.trim().to_string()),
            featured_image: input.featured_image,
            seo_meta_description: input.seo_meta_description.map(|s| s.trim().to_string()),
            seo_keywords: input.seo_keywords,
        };
        self.store
            .update_fields(id, patch)
            .await?
            .ok_or(ArticleError::NotFound)
    }

    /// Publish from any state; stamps `published_at` with the transition.
    pub async fn publish(&self, id: Uuid) -> Result<Article, ArticleError> {
        self.store
            .set_status(id, ArticleStatus::Published, true)
            .await?
            .ok_or(ArticleError::NotFound)
    }

    /// Back to draft; `published_at` keeps recording the last publish time.
    pub async fn unpublish(&self, id: Uuid) -> Result<Article, ArticleError> {
        self.store
            .set_status(id, ArticleStatus::Draft, false)
            .await?
            .ok_or(ArticleError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Uuid, ArticleError> {
        self.store.delete(id).await?.ok_or(ArticleError::NotFound)
    }

    /// Append to the visualization list. `position` is a display hint only;
    /// the stored list keeps append order.
    pub async fn add_visualization(
        &self,
        id: Uuid,
        visualization: Visualization,
    ) -> Result<Article, ArticleError> {
        self.store
            .push_visualization(id, &visualization)
            .await?
            .ok_or(ArticleError::NotFound)
    }

    /// Remove every entry matching the sub-id. Removing an id that is not
    /// present is a no-op success.
    pub async fn remove_visualization(
        &self,
        id: Uuid,
        viz_id: &str,
    ) -> Result<Article, ArticleError> {
        self.store
            .pull_visualization(id, viz_id)
            .await?
            .ok_or(ArticleError::NotFound)
    }
}

/// Derive a URL slug from a title: lowercase, trim, strip everything outside
/// word characters / spaces / hyphens, collapse whitespace runs to single
/// hyphens, and cap the length.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for ch in lowered.trim().chars() {
        if ch.is_whitespace() {
            pending_hyphen = !slug.is_empty();
        } else if ch.is_alphanumeric() || ch == '_' || ch == '-' {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(ch);
        }
    }

    slug.chars().take(SLUG_MAX_CHARS).collect()
}

fn first_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Apply the create-time default fills. Pure so the rules are testable
/// without a store.
fn assemble_new_article(input: CreateArticle, slug: String) -> NewArticle {
    let content = input.content.trim().to_string();
    let supplied_excerpt = non_empty(input.excerpt);
    let excerpt = supplied_excerpt
        .clone()
        .unwrap_or_else(|| first_chars(&content, EXCERPT_DEFAULT_CHARS));
    // The meta description falls back to the *supplied* excerpt, not the
    // derived one, then to the content prefix.
    let seo_meta_description = non_empty(input.seo_meta_description)
        .or(supplied_excerpt)
        .unwrap_or_else(|| first_chars(&content, SEO_DESCRIPTION_DEFAULT_CHARS));

    NewArticle {
        title: input.title.trim().to_string(),
        slug,
        content,
        excerpt,
        category: input.category.unwrap_or(Category::Other),
        tags: input.tags.unwrap_or_default(),
        author: non_empty(input.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        featured_image: non_empty(input.featured_image),
        seo_meta_description,
        seo_keywords: input.seo_keywords.unwrap_or_default(),
        visualizations: input.visualizations.unwrap_or_default(),
    }
}

/// Fill the add-visualization defaults; `None` when a required field is
/// missing or blank.
pub fn build_visualization(input: NewVisualization) -> Option<Visualization> {
    let id = non_empty(input.viz_id)?;
    let embed_url = non_empty(input.embed_url)?;
    Some(Visualization {
        id,
        kind: input.kind.unwrap_or_default(),
        embed_url,
        title: non_empty(input.title).unwrap_or_else(|| "Visualization".to_string()),
        position: input.position.unwrap_or(1),
        description: input.description.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(title: &str, content: &str) -> CreateArticle {
        CreateArticle {
            title: title.to_string(),
            content: content.to_string(),
            category: None,
            excerpt: None,
            tags: None,
            author: None,
            visualizations: None,
            seo_meta_description: None,
            seo_keywords: None,
            featured_image: None,
        }
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(
            slugify("Hello World Test Article"),
            "hello-world-test-article"
        );
    }

    #[test]
    fn slugify_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(slugify("Climate Change 2025: Data & Insights!"), "climate-change-2025-data-insights");
        assert_eq!(slugify("  spaced\t\tout   title  "), "spaced-out-title");
    }

    #[test]
    fn slugify_keeps_hyphens_and_underscores() {
        assert_eq!(slugify("pre-built_things"), "pre-built_things");
    }

    #[test]
    fn slugify_caps_at_100_chars() {
        let title = "word ".repeat(40);
        let slug = slugify(&title);
        assert_eq!(slug.chars().count(), 100);
        assert!(!slug.contains(' '));
    }

    #[test]
    fn slugify_is_lowercase_and_url_safe() {
        let slug = slugify("The QUICK Brown Fox — And Friends?");
        assert_eq!(slug, slug.to_lowercase());
        assert!(slug
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn create_defaults_fill_excerpt_from_content() {
        let long_content = "c".repeat(300);
        let article = assemble_new_article(create_input("A title here", &long_content), "a".into());
        assert_eq!(article.excerpt.chars().count(), 150);
        assert_eq!(article.seo_meta_description.chars().count(), 160);
        assert_eq!(article.author, "NITE Team");
        assert_eq!(article.category, Category::Other);
        assert!(article.tags.is_empty());
        assert!(article.visualizations.is_empty());
        assert!(article.featured_image.is_none());
    }

    #[test]
    fn create_defaults_prefer_supplied_excerpt_for_seo() {
        let mut input = create_input("A title here", "a content string over twenty chars");
        input.excerpt = Some("A hand-written excerpt".to_string());
        let article = assemble_new_article(input, "a".into());
        assert_eq!(article.excerpt, "A hand-written excerpt");
        assert_eq!(article.seo_meta_description, "A hand-written excerpt");
    }

    #[test]
    fn create_keeps_supplied_fields() {
        let mut input = create_input("A title here", "a content string over twenty chars");
        input.category = Some(Category::Business);
        input.author = Some("Sarah Smith".to_string());
        input.tags = Some(vec!["markets".to_string()]);
        let article = assemble_new_article(input, "a-title-here".into());
        assert_eq!(article.category, Category::Business);
        assert_eq!(article.author, "Sarah Smith");
        assert_eq!(article.tags, vec!["markets".to_string()]);
        assert_eq!(article.slug, "a-title-here");
    }

    #[test]
    fn visualization_requires_id_and_url() {
        assert!(build_visualization(NewVisualization::default()).is_none());
        assert!(build_visualization(NewVisualization {
            viz_id: Some("viz_1".into()),
            ..Default::default()
        })
        .is_none());
        assert!(build_visualization(NewVisualization {
            viz_id: Some("   ".into()),
            embed_url: Some("https://example.com".into()),
            ..Default::default()
        })
        .is_none());
    }

    #[test]
    fn visualization_defaults_filled() {
        let viz = build_visualization(NewVisualization {
            viz_id: Some("viz_1".into()),
            embed_url: Some("https://public.tableau.com/views/X/Y".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(viz.kind, VisualizationType::Tableau);
        assert_eq!(viz.title, "Visualization");
        assert_eq!(viz.position, 1);
        assert!(viz.description.is_empty());
    }
}
