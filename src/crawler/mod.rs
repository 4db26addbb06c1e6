// src/crawler/mod.rs

mod date;
mod error;
mod page;
mod parser_eba;

pub use date::parse_date;
pub use error::ExtractError;
pub use page::{ChromePage, HttpPage, PageHandle};

use crate::models::DocumentRecord;
use chrono::Utc;
use std::time::Duration;
use tracing;
use url::Url;

/// プラットフォーム上のソース名
pub const SOURCE_NAME: &str = "eba";

/// 巡回対象のリスティングページ (固定)
pub const LISTING_URL: &str = "https://www.abe-eba.eu/publications/";

/// 抽出器の設定。生成時に一度だけ決まり、以降は変更されない。
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// エントリコンテナが現れるまでの最大待機時間
    pub wait_timeout: Duration,
    /// 待機中に DOM を確認する間隔
    pub poll_interval: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// EBA の出版物リスティングからドキュメントを抽出する
///
/// ページハンドルは呼び出し側が所有し、抽出器は借用するだけ。
pub struct ListingExtractor<'a, P: PageHandle> {
    page: &'a mut P,
    config: ExtractorConfig,
}

impl<'a, P: PageHandle> ListingExtractor<'a, P> {
    pub fn new(page: &'a mut P) -> Self {
        Self::with_config(page, ExtractorConfig::default())
    }

    pub fn with_config(page: &'a mut P, config: ExtractorConfig) -> Self {
        tracing::debug!("Parser class init completed");
        tracing::info!("Set source: {}", SOURCE_NAME);
        Self { page, config }
    }

    /// 抽出のエントリポイント。プラットフォームから呼ばれる。
    ///
    /// 返り値の順序はページ上のエントリの順序と一致する。PDFリンクのない
    /// エントリは含まれない。ページの読み込みがタイムアウトした場合のみエラー。
    pub async fn content(&mut self) -> Result<Vec<DocumentRecord>, ExtractError> {
        tracing::debug!("Parse process start");
        let documents = self.parse().await?;
        tracing::debug!("Parse process finished");
        Ok(documents)
    }

    async fn parse(&mut self) -> Result<Vec<DocumentRecord>, ExtractError> {
        tracing::debug!("Parser enter to {}", LISTING_URL);
        let base_url = Url::parse(LISTING_URL)?;

        self.page.goto(LISTING_URL).await?;
        let html_content = self.wait_for_listing().await?;

        Ok(parser_eba::parse_listing(&html_content, &base_url, Utc::now()))
    }

    /// エントリコンテナが DOM に現れるまで待ち、その時点の HTML を返す
    async fn wait_for_listing(&self) -> Result<String, ExtractError> {
        let poll = poll_for_container(&*self.page, self.config.poll_interval);

        match tokio::time::timeout(self.config.wait_timeout, poll).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    "'{}' not present after {:?}",
                    parser_eba::CONTAINER_MARKER,
                    self.config.wait_timeout
                );
                Err(ExtractError::PageLoadTimeout {
                    selector: parser_eba::CONTAINER_MARKER,
                    waited: self.config.wait_timeout,
                })
            }
        }
    }
}

async fn poll_for_container<P: PageHandle>(
    page: &P,
    poll_interval: Duration,
) -> Result<String, ExtractError> {
    loop {
        let html_content = page.content().await?;
        if parser_eba::has_container(&html_content) {
            return Ok(html_content);
        }
        tokio::time::sleep(poll_interval).await;
    }
}
