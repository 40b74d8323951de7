//! dagchat 共通ライブラリ
//!
//! CLI バイナリから使う共有機能（エラー・ドメイン型・ポート・アダプタ・LLM 層）を提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// Outbound ポート（FS・環境変数・ログ）
pub mod ports;

/// 標準アダプタ実装
pub mod adapter;

/// LLM ドライバーとプロバイダ
pub mod llm;
