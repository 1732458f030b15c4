//! 共通APIモデル定義

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::color::{HexColor, RgbColor};
use crate::error::{HexRgbError, ParamSource, Result};

/// 変換結果（両方向で共通の形）
#[derive(Debug, Serialize)]
pub struct ConversionData {
    pub hex: HexColor,
    pub rgb: RgbColor,
    pub css: String,
}

impl From<RgbColor> for ConversionData {
    fn from(rgb: RgbColor) -> Self {
        ConversionData {
            hex: rgb.to_hex(),
            css: rgb.css(),
            rgb,
        }
    }
}

/// 成功レスポンス
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse { success: true, data }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&HexRgbError> for ErrorResponse {
    fn from(err: &HexRgbError) -> Self {
        ErrorResponse {
            success: false,
            error: err.error_code().to_string(),
            message: err.message(),
        }
    }
}

/// `/api` のドキュメント
#[derive(Debug, Serialize)]
pub struct ApiDocument {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
    pub examples: BTreeMap<&'static str, &'static str>,
}

impl ApiDocument {
    pub fn new() -> Self {
        let endpoints = BTreeMap::from([
            ("GET /api/convert/hex-to-rgb", "Convert HEX to RGB (query param)"),
            ("POST /api/convert/hex-to-rgb", "Convert HEX to RGB (body param)"),
            ("GET /api/convert/rgb-to-hex", "Convert RGB to HEX (query params)"),
            ("POST /api/convert/rgb-to-hex", "Convert RGB to HEX (body params)"),
        ]);
        let examples = BTreeMap::from([
            ("get", "/api/convert/hex-to-rgb?hex=FF5733"),
            ("post", r#"POST /api/convert/hex-to-rgb with body: { "hex": "FF5733" }"#),
            ("get_rgb", "/api/convert/rgb-to-hex?r=255&g=87&b=51"),
            ("post_rgb", r#"POST /api/convert/rgb-to-hex with body: { "r": 255, "g": 87, "b": 51 }"#),
        ]);

        ApiDocument {
            message: "HEX to RGB Conversion API",
            version: crate::VERSION,
            endpoints,
            examples,
        }
    }
}

impl Default for ApiDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// クエリ・ボディから取り出した生パラメータ
///
/// クエリとフォームの値は常に文字列、JSONボディは元の型のまま保持する。
#[derive(Debug, Default, Clone)]
pub struct RawParams(Map<String, Value>);

impl RawParams {
    /// クエリ文字列（またはフォーム）のパラメータから作成
    pub fn from_pairs(pairs: HashMap<String, String>) -> Self {
        RawParams(pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
    }

    /// JSONボディから作成
    ///
    /// オブジェクト以外（配列・null等）は空のパラメータとして扱う。
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| HexRgbError::MalformedBody(e.to_string()))?;
        Ok(match value {
            Value::Object(map) => RawParams(map),
            _ => RawParams::default(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `hex` パラメータを取り出す
    ///
    /// 欠落・null・空文字は「未指定」、文字列以外は不正なHEXとして扱う。
    pub fn hex(&self, source: ParamSource) -> Result<&str> {
        match self.get("hex") {
            None | Some(Value::Null) => Err(HexRgbError::MissingParameter(source)),
            Some(Value::String(s)) if s.is_empty() => Err(HexRgbError::MissingParameter(source)),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(HexRgbError::InvalidHexFormat),
        }
    }

    /// `r`, `g`, `b` を解析してRGB色を得る
    pub fn rgb(&self) -> Result<RgbColor> {
        RgbColor::from_raw(self.get("r"), self.get("g"), self.get("b"))
            .ok_or(HexRgbError::InvalidRgbValues)
    }
}
