pub mod article;

pub use article::{
    Article, ArticlePatch, ArticleStatus, ArticleSummary, Category, NewArticle, Visualization,
    VisualizationType,
};
