//! hexrgb 共通ライブラリ
//!
//! HEX ⇄ RGB 変換ロジックと、それを公開するHTTPハンドラー・設定を提供

pub mod error;
pub mod color;
pub mod config;
pub mod api;

// バージョン情報
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

// 主要な型の再エクスポート
pub use error::{HexRgbError, ParamSource, Result};
pub use color::{hex_to_rgb, rgb_to_hex, parse_channel, HexColor, RgbColor};
pub use config::Settings;
