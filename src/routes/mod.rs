// src/routes/mod.rs
use crate::state::AppState;
use axum::Router;

mod extract;
mod swagger;

/// アプリケーション全体のルーターを構築
pub fn create_router(app_state: AppState) -> Router {
    // API ルーター
    let api_router = extract::create_extract_routes();

    // Swagger UI ルーター
    let swagger_routes = swagger::create_swagger_routes();

    // ルーターをマージ
    Router::new()
        .merge(swagger_routes)
        // API全体を "/api" パス以下にネスト
        .nest("/api", api_router)
        .with_state(app_state)
}
