// main.rs
use chromiumoxide::{Browser, BrowserConfig};
use eba_scraper::{crawler::ExtractorConfig, routes, state::AppState};
use futures::StreamExt;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(filter).init();

    let defaults = ExtractorConfig::default();
    let extractor_config = ExtractorConfig {
        wait_timeout: env_duration("EBA_WAIT_TIMEOUT_SECS", Duration::from_secs, defaults.wait_timeout),
        poll_interval: env_duration("EBA_POLL_INTERVAL_MS", Duration::from_millis, defaults.poll_interval),
    };
    tracing::info!("Extractor config: {:?}", extractor_config);

    // リスティングはクライアントサイドで描画されるため、既定はヘッドレスブラウザ。
    // "http" はサーバーサイド描画のスナップショット (ミラーなど) 向け
    let browser_mode = std::env::var("EBA_BROWSER").ok();
    let browser = if uses_browser(browser_mode.as_deref()) {
        tracing::info!("Launching headless browser");
        Some(launch_browser().await?)
    } else {
        tracing::info!("Using plain HTTP fetching");
        None
    };

    let app_state = AppState {
        http_client: reqwest::Client::new(),
        browser,
        extractor_config,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_router(app_state).layer(cors);

    // サーバーの起動
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    tracing::info!("🚀 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn uses_browser(mode: Option<&str>) -> bool {
    !mode.is_some_and(|m| m.trim().eq_ignore_ascii_case("http"))
}

fn env_duration(key: &str, unit: fn(u64) -> Duration, default: Duration) -> Duration {
    match std::env::var(key) {
        Ok(value) => match value.trim().parse::<u64>() {
            Ok(n) => unit(n),
            Err(e) => {
                tracing::warn!("Ignoring invalid {}={:?}: {}", key, value, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// ヘッドレス Chromium を起動し、CDP イベントを処理するタスクを立ち上げる
async fn launch_browser() -> Result<Arc<Browser>, Box<dyn std::error::Error>> {
    let config = BrowserConfig::builder().build()?;
    let (browser, mut handler) = Browser::launch(config).await?;

    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::error!("Browser handler stopped: {}", e);
                break;
            }
        }
    });

    Ok(Arc::new(browser))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_is_the_default_mode() {
        assert!(uses_browser(None));
        assert!(uses_browser(Some("chrome")));
        assert!(!uses_browser(Some("http")));
        assert!(!uses_browser(Some(" HTTP ")));
    }
}
