// models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// 1. DocumentRecord (プラットフォームへ渡す正規化済みドキュメント)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentRecord {
    pub id: Option<i64>, // 永続化時にプラットフォームが採番する
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub text: Option<String>,
    pub web_link: String,
    pub local_link: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub other_data: Option<serde_json::Value>,
    pub pub_date: Option<DateTime<Utc>>,
    pub load_date: Option<DateTime<Utc>>, // プラットフォームが設定する
}

impl DocumentRecord {
    /// リスティングの1エントリから抽出したメタデータでレコードを作る。
    /// 本文・ローカルコピー・ID などは常に空。
    pub fn from_listing_entry(
        title: String,
        abstract_text: Option<String>,
        web_link: String,
        pub_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: None,
            title,
            abstract_text,
            text: None,
            web_link,
            local_link: None,
            other_data: None,
            pub_date,
            load_date: None,
        }
    }

    /// プラットフォーム共通のログ行
    pub fn log_summary(&self) -> String {
        let pub_date = self
            .pub_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "None".to_string());
        format!(
            "Find document | name: {} | link to web: {} | publication date: {}",
            self.title, self.web_link, pub_date
        )
    }
}

// 抽出 (POST /api/extract) のレスポンス
#[derive(Debug, Serialize, ToSchema)]
pub struct ExtractResponse {
    pub source: String,
    pub count: usize,
    pub documents: Vec<DocumentRecord>,
}
