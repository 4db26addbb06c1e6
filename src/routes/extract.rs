// src/routes/extract.rs
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chromiumoxide::Browser;
use tracing;

use crate::crawler::{
    ChromePage, ExtractError, ExtractorConfig, HttpPage, ListingExtractor, SOURCE_NAME,
};
use crate::models::{DocumentRecord, ExtractResponse};
use crate::state::AppState;

/// 抽出用ルート (/extract) を構築します
pub fn create_extract_routes() -> Router<AppState> {
    Router::new().route("/extract", post(run_extraction))
}

/// リスティングページを1回抽出し、ドキュメントを返す (POST /api/extract)
#[utoipa::path(
    post,
    path = "/api/extract",
    tag = "Extract",
    responses(
        (
            status = 200,
            description = "抽出したドキュメント (ページ上の順序)",
            body = ExtractResponse,
            example = json!({
                "source": "eba",
                "count": 1,
                "documents": [{
                    "id": null,
                    "title": "Guideline on X ",
                    "abstract": "Short summary",
                    "text": null,
                    "web_link": "https://www.abe-eba.eu/media/doc1.pdf",
                    "local_link": null,
                    "other_data": null,
                    "pub_date": "2024-01-03T00:00:00Z",
                    "load_date": null
                }]
            })
        ),
        (status = 502, description = "ページの取得に失敗"),
        (status = 504, description = "リスティングの読み込みがタイムアウト")
    )
)]
pub(super) async fn run_extraction(
    State(state): State<AppState>,
) -> Result<Json<ExtractResponse>, (StatusCode, String)> {
    tracing::info!("Extraction triggered for source: {}", SOURCE_NAME);

    // ページハンドルはリクエストごとに作り、他の抽出とは共有しない
    let result = match &state.browser {
        Some(browser) => extract_with_browser(browser, &state.extractor_config).await,
        None => {
            let mut page = HttpPage::new(state.http_client.clone());
            ListingExtractor::with_config(&mut page, state.extractor_config.clone())
                .content()
                .await
        }
    };

    match result {
        Ok(documents) => {
            tracing::info!("Extraction finished: {} documents", documents.len());
            Ok(Json(ExtractResponse {
                source: SOURCE_NAME.to_string(),
                count: documents.len(),
                documents,
            }))
        }
        Err(e) => {
            tracing::error!("Extraction failed: {}", e);
            Err((error_status(&e), e.to_string()))
        }
    }
}

/// 新しいタブを開いて抽出し、終わったら閉じる
async fn extract_with_browser(
    browser: &Browser,
    config: &ExtractorConfig,
) -> Result<Vec<DocumentRecord>, ExtractError> {
    let tab = browser.new_page("about:blank").await?;
    let mut page = ChromePage::new(tab);

    let result = ListingExtractor::with_config(&mut page, config.clone())
        .content()
        .await;

    if let Err(e) = page.into_inner().close().await {
        tracing::debug!("Failed to close browser tab: {}", e);
    }
    result
}

fn error_status(err: &ExtractError) -> StatusCode {
    match err {
        ExtractError::PageLoadTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}
