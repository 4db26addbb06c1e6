// src/crawler/error.rs
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

/// クローラーモジュール専用のエラー型
///
/// エントリ単位の欠損 (PDFリンクなし・日付なしなど) はここには現れない。
/// それらはログに記録されるだけで、呼び出し側には伝播しない。
#[derive(Debug)]
pub enum ExtractError {
    /// 待機時間内にエントリコンテナが現れなかった
    PageLoadTimeout {
        selector: &'static str,
        waited: Duration,
    },
    Fetch(reqwest::Error),
    Http(String),
    Browser(String),
    Url(url::ParseError),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::PageLoadTimeout { selector, waited } => write!(
                f,
                "Page load timeout: '{}' not present after {:?}",
                selector, waited
            ),
            ExtractError::Fetch(e) => write!(f, "Failed to fetch URL: {}", e),
            ExtractError::Http(s) => write!(f, "HTTP error: {}", s),
            ExtractError::Browser(s) => write!(f, "Browser error: {}", s),
            ExtractError::Url(e) => write!(f, "Invalid URL: {}", e),
        }
    }
}

impl StdError for ExtractError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ExtractError::Fetch(e) => Some(e),
            ExtractError::Url(e) => Some(e),
            _ => None,
        }
    }
}

// --- 便利な From 実装 ---
impl From<reqwest::Error> for ExtractError {
    fn from(e: reqwest::Error) -> Self {
        ExtractError::Fetch(e)
    }
}
impl From<url::ParseError> for ExtractError {
    fn from(e: url::ParseError) -> Self {
        ExtractError::Url(e)
    }
}
impl From<chromiumoxide::error::CdpError> for ExtractError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        ExtractError::Browser(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_the_selector() {
        let err = ExtractError::PageLoadTimeout {
            selector: ".publication",
            waited: Duration::from_secs(20),
        };
        assert_eq!(
            err.to_string(),
            "Page load timeout: '.publication' not present after 20s"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn url_errors_keep_their_source() {
        let err: ExtractError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, ExtractError::Url(_)));
        assert!(err.source().is_some());
    }
}
