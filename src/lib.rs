// lib.rs
//! EBA (abe-eba.eu) の出版物リスティングを抽出するプラグイン。
//!
//! プラットフォームは自分のページハンドルを [`ListingExtractor`] に貸し、
//! [`ListingExtractor::content`] を呼んで [`DocumentRecord`] の列を受け取る。

pub mod crawler;
pub mod models;
pub mod routes;
pub mod state;

pub use crawler::{ExtractError, ExtractorConfig, ListingExtractor, PageHandle};
pub use models::DocumentRecord;
