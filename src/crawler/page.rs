// src/crawler/page.rs
use super::ExtractError;
use async_trait::async_trait;
use tracing;

/// 抽出器が必要とするページ操作 (ナビゲーションと描画済み DOM の取得)
///
/// ハンドルは呼び出し側が所有する。現在の URL と DOM という可変状態を持つため、
/// 1回の抽出の間は `&mut` で借用され、他の抽出と共有されない。
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// 指定 URL へ移動する
    async fn goto(&mut self, url: &str) -> Result<(), ExtractError>;

    /// 現在の描画済み DOM のスナップショットを HTML 文字列で返す
    async fn content(&self) -> Result<String, ExtractError>;
}

// --- HTTP (サーバーサイド描画のページ用) ---

/// reqwest で取得した HTML をそのまま DOM として扱うページ
pub struct HttpPage {
    client: reqwest::Client,
    html_content: String,
}

impl HttpPage {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            html_content: String::new(),
        }
    }
}

#[async_trait]
impl PageHandle for HttpPage {
    async fn goto(&mut self, url: &str) -> Result<(), ExtractError> {
        tracing::info!("Fetching HTML from: {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Failed to fetch URL {}: {}", url, status);
            return Err(ExtractError::Http(format!(
                "HTTP Error for {}: {}",
                url, status
            )));
        }
        self.html_content = response.text().await?;
        tracing::info!("Successfully fetched HTML from: {}", url);
        Ok(())
    }

    async fn content(&self) -> Result<String, ExtractError> {
        Ok(self.html_content.clone())
    }
}

// --- ヘッドレスブラウザ (クライアントサイド描画のページ用) ---

/// 呼び出し側が開いた chromiumoxide のタブをラップする
pub struct ChromePage {
    page: chromiumoxide::Page,
}

impl ChromePage {
    pub fn new(page: chromiumoxide::Page) -> Self {
        Self { page }
    }

    pub fn into_inner(self) -> chromiumoxide::Page {
        self.page
    }
}

#[async_trait]
impl PageHandle for ChromePage {
    async fn goto(&mut self, url: &str) -> Result<(), ExtractError> {
        tracing::info!("Navigating browser to: {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn content(&self) -> Result<String, ExtractError> {
        Ok(self.page.content().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn http_page_keeps_the_fetched_body() {
        let base = serve(Router::new().route(
            "/publications/",
            get(|| async { r#"<div class="publication"></div>"# }),
        ))
        .await;

        let mut page = HttpPage::new(reqwest::Client::new());
        assert_eq!(page.content().await.unwrap(), "");

        page.goto(&format!("{}/publications/", base)).await.unwrap();

        assert_eq!(
            page.content().await.unwrap(),
            r#"<div class="publication"></div>"#
        );
    }

    #[tokio::test]
    async fn http_page_rejects_error_status() {
        let base = serve(Router::new().route(
            "/publications/",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        ))
        .await;

        let mut page = HttpPage::new(reqwest::Client::new());
        let err = page
            .goto(&format!("{}/publications/", base))
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Http(msg) if msg.contains("503")));
    }
}
