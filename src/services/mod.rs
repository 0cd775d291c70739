pub mod article_service;
pub mod lead_service;

pub use article_service::{ArticleService, CreateArticle, NewVisualization, UpdateArticle};
pub use lead_service::LeadService;
