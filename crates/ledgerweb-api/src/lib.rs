//! HTTP server and HTML views for the household ledger
//!
//! Routes are organized into modules:
//! - routes::input: income and expense input forms and their submissions
//! - routes::listing: monthly listing and delete
//! - routes::summary: yearly summary by payer

pub mod error;
pub mod form;
pub mod routes;

use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use ledgerweb_config::Config;
use ledgerweb_core::Ledger;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::input::{api_payers, do_expense, do_income, page_expense, page_income};
    use routes::listing::{api_entries, do_delete, page_list};
    use routes::summary::{api_summary, page_summary};

    let api = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/entries/:year/:month", get(api_entries))
        .route("/api/summary/:year", get(api_summary))
        .route("/api/payers", get(api_payers))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]));

    Router::new()
        .merge(api)
        .route("/", get(index_page))
        .route("/user/income", get(page_income))
        .route("/user/expense", get(page_expense))
        .route("/user/doincome", post(do_income))
        .route("/user/doexpense", post(do_expense))
        .route("/user/list", get(page_list))
        .route("/user/summary", get(page_summary))
        .route("/user/dodelete", post(do_delete))
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn index_page() -> Response {
    found("/user/list")
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound {
        resource: uri.path().to_string(),
    }
}

/// 302 redirect to `location`
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - ledgerweb</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css">
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(ledger_name: &str, current_path: &str) -> String {
    let links = [
        ("/user/list", "一覧"),
        ("/user/income", "収入入力"),
        ("/user/expense", "支出入力"),
        ("/user/summary", "集計"),
    ];

    let mut nav = format!(
        "<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>{}</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>",
        ledgerweb_utils::escape_html(ledger_name)
    );
    for (path, label) in &links {
        let active_class = if current_path.starts_with(path) {
            "bg-indigo-50 text-indigo-600"
        } else {
            "text-gray-600 hover:bg-gray-50"
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'><span>{}</span></a></li>"#,
            path, active_class, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Full page with sidebar around `inner_content`
pub fn page_response(state: &AppState, title: &str, current_path: &str, inner_content: &str) -> Html<String> {
    Html(base_html(
        title,
        &format!(
            r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(&state.config.ledger.name, current_path),
            inner_content
        ),
    ))
}

/// Start the HTTP server
///
/// Binds to `server.host:server.port` and serves until Ctrl-C.
pub async fn start_server(config: Config, ledger: Arc<Ledger>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { ledger, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting ledgerweb server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /user/list (Monthly listing)");
    log::info!("  - /user/income, /user/expense (Input forms)");
    log::info!("  - /user/summary (Yearly summary)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::{create_router, nav_sidebar};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_root_redirects_to_listing() {
        let (status, location, _) = send(create_router(state()), get("/")).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location.as_deref(), Some("/user/list"));
    }

    #[tokio::test]
    async fn test_health_and_not_found() {
        let (status, _, body) = send(create_router(state()), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");

        let (status, _, body) = send(create_router(state()), get("/logout")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found: /logout");
    }

    #[test]
    fn test_nav_marks_current_page() {
        let nav = nav_sidebar("a<b", "/user/summary");
        assert!(nav.contains("a&lt;b"));
        assert!(nav.contains("href='/user/summary' class='flex items-center gap-2 px-3 py-2 rounded-lg bg-indigo-50"));
    }
}
