//! エラーハンドリング
//!
//! メッセージと終了コードを分類ごとに持つエラー型。
//! 終了コードは sysexits に倣う（64: usage, 70: software, 74: io）。

use thiserror::Error;

/// 共通エラー型
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// 引数不正（終了コード 64）
    #[error("{0}")]
    InvalidArgument(String),

    /// 内部エラー（終了コード 70）
    #[error("{0}")]
    System(String),

    /// 環境変数の欠落・不正（終了コード 70）
    #[error("{0}")]
    Env(String),

    /// ファイル I/O エラー（終了コード 74）
    #[error("{0}")]
    Io(String),

    /// HTTP エラー（終了コード 74）
    #[error("{0}")]
    Http(String),

    /// JSON の解析・生成エラー（終了コード 74）
    #[error("{0}")]
    Json(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    /// 使い方の誤り（usage を表示すべきエラー）か
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// プロセスの終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::System(_) | Self::Env(_) => 70,
            Self::Io(_) | Self::Http(_) | Self::Json(_) => 74,
        }
    }
}
