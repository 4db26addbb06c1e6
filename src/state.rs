// state.rs
use crate::crawler::ExtractorConfig;
use chromiumoxide::Browser;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    // Some のときはヘッドレスブラウザでページを描画する
    pub browser: Option<Arc<Browser>>,
    pub extractor_config: ExtractorConfig,
}
