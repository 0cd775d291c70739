use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use once_cell::sync::Lazy;
use tera::{Context, Tera};

/// Templates are embedded at compile time so rendering never depends on the
/// process working directory.
static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        ("index.html", include_str!("../../templates/index.html")),
        ("request.html", include_str!("../../templates/request.html")),
        ("articles.html", include_str!("../../templates/articles.html")),
        ("article.html", include_str!("../../templates/article.html")),
        ("error.html", include_str!("../../templates/error.html")),
    ])
    .expect("embedded templates must parse");
    tera
});

/// Render a page, or a plain 500 when the template itself fails.
pub fn render(template: &str, context: &Context) -> Response {
    render_with_status(template, context, StatusCode::OK)
}

pub fn render_with_status(template: &str, context: &Context, status: StatusCode) -> Response {
    match TEMPLATES.render(template, context) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Template render failed for {}: {}", template, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Something went wrong</h1>".to_string()),
            )
                .into_response()
        }
    }
}

/// The shared error page.
pub fn render_error_page(status: StatusCode, error: &str, message: &str) -> Response {
    let mut context = Context::new();
    context.insert("error", error);
    context.insert("message", message);
    render_with_status("error.html", &context, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_templates_parse() {
        // Force the Lazy to initialize; a template syntax error panics here.
        let _ = &*TEMPLATES;
    }

    #[test]
    fn error_template_renders() {
        let mut context = Context::new();
        context.insert("error", "Article not found");
        context.insert("message", "The article you're looking for doesn't exist.");
        let body = TEMPLATES.render("error.html", &context).unwrap();
        assert!(body.contains("Article not found"));
    }

    #[test]
    fn index_template_renders_with_and_without_message() {
        let mut context = Context::new();
        context.insert("message", &Option::<String>::None);
        context.insert("error", &Option::<String>::None);
        assert!(TEMPLATES.render("index.html", &context).is_ok());

        let mut context = Context::new();
        context.insert("message", "Feedback submitted successfully!");
        context.insert("error", &Option::<String>::None);
        let body = TEMPLATES.render("index.html", &context).unwrap();
        assert!(body.contains("Feedback submitted successfully!"));
    }
}
