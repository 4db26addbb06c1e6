// src/routes/swagger.rs
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// models.rs から ToSchema を実装した型をすべてインポートする
use crate::models::{DocumentRecord, ExtractResponse};

// --- APIドキュメントの定義 ---

#[derive(OpenApi)]
#[openapi(
    paths(crate::routes::extract::run_extraction),
    components(schemas(DocumentRecord, ExtractResponse)),
    tags(
        (name = "EBA Scraper API", description = "EBA 出版物リスティングの抽出API")
    )
)]
struct ApiDoc;

// --- ルーターの構築 ---

/// Swagger UI をホストするルーターを返します。
/// ( /api-docs にUI、 /api-docs/openapi.json に仕様JSON)
pub fn create_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_the_extract_endpoint() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("/api/extract"));
        assert!(json.contains("DocumentRecord"));
    }
}
