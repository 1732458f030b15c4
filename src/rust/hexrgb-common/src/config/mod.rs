//! 共通設定管理モジュール

use actix_web::http::Uri;
use serde::{Deserialize, Serialize};
use std::env;
use crate::error::{HexRgbError, Result};

/// サーバー設定
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// バインドするホストアドレス
    pub host: String,

    /// ポート番号
    pub port: u16,

    /// ワーカースレッド数
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            workers: None,
        }
    }
}

/// ロギング設定
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// ログレベル（EnvFilter の書式）
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

/// API設定
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// CORS許可オリジン
    pub cors_origins: Vec<String>,

    /// 最大リクエストボディサイズ（バイト）
    pub max_body_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            cors_origins: vec!["*".to_string()],
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// 静的ファイル配信設定
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticConfig {
    /// 配信ディレクトリ（未指定なら配信しない）
    pub dir: Option<String>,
}

/// アプリケーション設定
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// サーバー設定
    pub server: ServerConfig,

    /// ロギング設定
    pub logging: LoggingConfig,

    /// API設定
    pub api: ApiConfig,

    /// 静的ファイル配信設定
    pub static_files: StaticConfig,
}

impl Settings {
    /// 設定を読み込む
    ///
    /// 読み込み優先順位：
    /// 1. 環境変数
    /// 2. 設定ファイル（`CONFIG_FILE` が指定された場合）
    /// 3. デフォルト値
    pub fn new() -> Result<Self> {
        let mut settings = Self::default();

        if let Ok(config_path) = env::var("CONFIG_FILE") {
            settings = Self::from_file(&config_path)?;
        }

        settings.apply_overrides(|key| env::var(key).ok());

        Ok(settings)
    }

    /// 設定ファイルから読み込む
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str_with_format(path, &content)
    }

    /// 拡張子で形式を判定してパース
    fn from_str_with_format(path: &str, content: &str) -> Result<Self> {
        // JSON形式
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .map_err(|e| HexRgbError::Config(format!("Failed to parse JSON config: {}", e)))
        }
        // TOML形式
        else if path.ends_with(".toml") {
            toml::from_str(content)
                .map_err(|e| HexRgbError::Config(format!("Failed to parse TOML config: {}", e)))
        }
        // YAML形式
        else if path.ends_with(".yaml") || path.ends_with(".yml") {
            serde_yaml::from_str(content)
                .map_err(|e| HexRgbError::Config(format!("Failed to parse YAML config: {}", e)))
        } else {
            Err(HexRgbError::Config("Unsupported config file format".to_string()))
        }
    }

    /// 環境変数（またはそれに準ずる取得関数）で設定を上書き
    ///
    /// 数値として読めない値は無視する。
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // サーバー設定
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(workers) = lookup("WORKERS").and_then(|w| w.trim().parse().ok()) {
            self.server.workers = Some(workers);
        }

        // ロギング設定
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }

        // API設定
        if let Some(cors_origins) = lookup("CORS_ORIGINS") {
            self.api.cors_origins = cors_origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(size) = lookup("MAX_BODY_SIZE").and_then(|s| s.trim().parse().ok()) {
            self.api.max_body_size = size;
        }

        // 静的ファイル
        if let Some(dir) = lookup("STATIC_DIR") {
            self.static_files.dir = Some(dir);
        }
    }

    /// 設定を検証
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(HexRgbError::Config("Invalid port number: 0".to_string()));
        }

        if self.api.max_body_size == 0 {
            return Err(HexRgbError::Config("max_body_size must be greater than 0".to_string()));
        }

        if self.logging.level.trim().is_empty() {
            return Err(HexRgbError::Config("Log level cannot be empty".to_string()));
        }

        // CORSオリジンは "*" か scheme://host 形式
        for origin in self.api.cors_origins.iter().filter(|o| o.as_str() != "*") {
            let valid = origin
                .parse::<Uri>()
                .map(|uri| uri.scheme().is_some() && uri.host().is_some())
                .unwrap_or(false);
            if !valid {
                return Err(HexRgbError::Config(format!("Invalid CORS origin: {}", origin)));
            }
        }

        Ok(())
    }

    /// バインドアドレス（`host:port`）
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
