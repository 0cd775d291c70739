use axum::routing::{delete, get, post};
use axum::Router;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use nite_cms::config;
use nite_cms::database::manager::DatabaseManager;
use nite_cms::database::schema;
use nite_cms::handlers::{admin, forms, pages, public};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and ADMIN_TOKEN
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting nite-cms in {:?} mode", config.environment);

    // Both are required up front; refusing to start beats limping along
    if config.database.url.is_none() {
        anyhow::bail!("DATABASE_URL must be set");
    }
    if config.security.admin_token.is_empty() {
        anyhow::bail!("ADMIN_TOKEN must be set");
    }

    let pool = DatabaseManager::pool().await?;
    schema::ensure_schema(&pool).await?;

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("nite-cms listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app() -> Router {
    let config = config::config();

    let mut app = Router::new()
        .merge(page_routes())
        .merge(api_routes())
        .route("/health", get(health));

    if config.security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

fn page_routes() -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/request", get(pages::request_form))
        .route("/articles", get(pages::article_list))
        .route("/articles/:slug", get(pages::article_detail))
        .route("/feedback-form", post(forms::submit_feedback))
        .route("/request-form", post(forms::submit_request))
}

/// Public reads and admin mutations share paths, so each path carries its
/// full method set here; the admin handlers authenticate via `AdminGate`.
fn api_routes() -> Router {
    Router::new()
        .route(
            "/api/articles",
            get(public::articles::list).post(admin::articles::create),
        )
        .route(
            "/api/articles/category/:category",
            get(public::articles::by_category),
        )
        .route(
            "/api/articles/:key",
            get(public::articles::by_slug)
                .put(admin::articles::update)
                .delete(admin::articles::remove),
        )
        .route("/api/articles/:key/publish", post(admin::articles::publish))
        .route(
            "/api/articles/:key/unpublish",
            post(admin::articles::unpublish),
        )
        .route(
            "/api/articles/:key/visualizations",
            post(admin::visualizations::add),
        )
        .route(
            "/api/articles/:key/visualizations/:viz_id",
            delete(admin::visualizations::remove),
        )
        .route("/api/articles-admin/all", get(admin::articles::list_all))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
