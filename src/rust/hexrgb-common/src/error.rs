//! 共通エラー型定義

use std::fmt;
use thiserror::Error;

/// パラメータの取得元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// クエリ文字列
    Query,
    /// リクエストボディ
    Body,
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSource::Query => write!(f, "query string"),
            ParamSource::Body => write!(f, "request body"),
        }
    }
}

/// hexrgb共通エラー型
#[derive(Debug, Error)]
pub enum HexRgbError {
    /// 必須パラメータが無い
    #[error("Missing hex parameter in {0}")]
    MissingParameter(ParamSource),

    /// HEX形式が不正
    #[error("Invalid hex color code")]
    InvalidHexFormat,

    /// RGB値が不正（欠落・非整数・範囲外を区別しない）
    #[error("Invalid RGB values")]
    InvalidRgbValues,

    /// ボディのJSONが壊れている
    #[error("Invalid JSON body: {0}")]
    MalformedBody(String),

    /// ルートが存在しない
    #[error("Route not found")]
    RouteNotFound,

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO エラー
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result型のエイリアス
pub type Result<T> = std::result::Result<T, HexRgbError>;

impl HexRgbError {
    /// HTTPステータスコードを返す
    pub fn status_code(&self) -> u16 {
        match self {
            HexRgbError::MissingParameter(_)
            | HexRgbError::InvalidHexFormat
            | HexRgbError::InvalidRgbValues
            | HexRgbError::MalformedBody(_) => 400,
            HexRgbError::RouteNotFound => 404,
            HexRgbError::Config(_) | HexRgbError::Io(_) => 500,
        }
    }

    /// エラーコードを返す（レスポンスの `error` フィールド）
    pub fn error_code(&self) -> &'static str {
        match self {
            HexRgbError::MissingParameter(_) => "Missing hex parameter",
            HexRgbError::InvalidHexFormat => "Invalid hex color code",
            HexRgbError::InvalidRgbValues => "Invalid RGB values",
            HexRgbError::MalformedBody(_) => "Invalid JSON body",
            HexRgbError::RouteNotFound => "Route not found",
            HexRgbError::Config(_) => "Configuration error",
            HexRgbError::Io(_) => "IO error",
        }
    }

    /// 利用者向けの説明（`message` フィールド）
    ///
    /// RGB変換エラーと404は `message` を持たない。既存クライアントとの互換のため。
    pub fn message(&self) -> Option<String> {
        match self {
            HexRgbError::MissingParameter(source) => {
                Some(format!("Please provide a hex color code in the {}", source))
            }
            HexRgbError::InvalidHexFormat => Some(
                "Please provide a valid hex color code (e.g., FFFFFF or #FFFFFF)".to_string(),
            ),
            HexRgbError::MalformedBody(detail) => Some(detail.clone()),
            HexRgbError::InvalidRgbValues | HexRgbError::RouteNotFound => None,
            HexRgbError::Config(detail) => Some(detail.clone()),
            HexRgbError::Io(e) => Some(e.to_string()),
        }
    }
}
