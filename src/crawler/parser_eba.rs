// src/crawler/parser_eba.rs
use super::date::parse_date;
use crate::models::DocumentRecord;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing;
use url::Url;

// --- EBA パーサー ---

/// エントリコンテナの目印 (これが現れるまでページの描画を待つ)
pub(super) const CONTAINER_MARKER: &str = ".publication";

/// EBA のセレクタを保持する構造体
struct EbaSelectors {
    container: Selector,
    entry_body: Selector,
    link: Selector,
    heading: Selector,
    small_print: Selector,
    date_label: Selector,
}

/// セレクタを起動時に一度だけパースする
static SELECTORS: Lazy<EbaSelectors> = Lazy::new(|| EbaSelectors {
    container: Selector::parse(CONTAINER_MARKER).expect("Failed to parse container selector"),
    // class 属性に "media-body" を含む div (部分一致)
    entry_body: Selector::parse(r#"div[class*="media-body"]"#)
        .expect("Failed to parse entry body selector"),
    link: Selector::parse("a").expect("Failed to parse link selector"),
    heading: Selector::parse("h3").expect("Failed to parse heading selector"),
    small_print: Selector::parse("small").expect("Failed to parse small print selector"),
    date_label: Selector::parse("h6").expect("Failed to parse date label selector"),
});

/// 描画済み HTML にエントリコンテナが存在するか
pub(super) fn has_container(html_content: &str) -> bool {
    let document = Html::parse_document(html_content);
    document.select(&SELECTORS.container).next().is_some()
}

/// リスティングページの全エントリを文書順に処理し、抽出できたレコードを返す。
/// PDFリンクのないエントリはスキップされる。
pub(super) fn parse_listing(
    html_content: &str,
    base_url: &Url,
    now: DateTime<Utc>,
) -> Vec<DocumentRecord> {
    let document = Html::parse_document(html_content);
    let mut documents = Vec::new();

    for entry in document.select(&SELECTORS.entry_body) {
        if let Some(doc) = parse_entry(entry, base_url, now) {
            tracing::info!("{}", doc.log_summary());
            documents.push(doc);
        }
    }

    if documents.is_empty() {
        tracing::warn!("No documents found in the EBA listing {}.", base_url);
    }

    documents
}

fn parse_entry(entry: ElementRef<'_>, base_url: &Url, now: DateTime<Utc>) -> Option<DocumentRecord> {
    let Some(web_link) = find_pdf_link(entry, base_url) else {
        tracing::debug!("pdf web link not found, skipping:\n{}", rendered_text(entry));
        return None;
    };

    let Some(heading) = find_optional(entry, &SELECTORS.heading) else {
        tracing::warn!("heading not found, skipping:\n{}", rendered_text(entry));
        return None;
    };

    // <small> がなければ abstract は空として扱う
    let abstract_text = find_optional(heading, &SELECTORS.small_print)
        .map(rendered_text)
        .unwrap_or_default();

    let heading_text = rendered_text(heading);
    let title = if abstract_text.is_empty() {
        heading_text
    } else {
        heading_text.replacen(&abstract_text, "", 1)
    };

    let pub_date = find_optional(entry, &SELECTORS.date_label).and_then(|label| {
        let label_text = rendered_text(label);
        let parsed = parse_date(&label_text, now);
        if parsed.is_none() {
            tracing::debug!("publication date not recognized: {:?}", label_text);
        }
        parsed
    });

    Some(DocumentRecord::from_listing_entry(
        title,
        Some(abstract_text).filter(|s| !s.is_empty()),
        web_link,
        pub_date,
    ))
}

/// エントリ内のリンクのうち、".pdf" で終わる最初のものを返す
fn find_pdf_link(entry: ElementRef<'_>, base_url: &Url) -> Option<String> {
    entry
        .select(&SELECTORS.link)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| match base_url.join(href.trim()) {
            Ok(full_url) => Some(full_url.to_string()),
            Err(e) => {
                tracing::warn!("Failed to join URL: {} with base {}: {}", href, base_url, e);
                None
            }
        })
        .find(|href| href.ends_with(".pdf"))
}

fn find_optional<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// ブラウザが返す表示テキストと同様に、空白を1つにまとめて前後を削る
fn rendered_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
