//! 変換APIモジュール

pub mod models;
pub mod handlers;

// 再エクスポート
pub use models::{ApiDocument, ApiResponse, ConversionData, ErrorResponse, RawParams};
pub use handlers::{
    configure,
    not_found,
    api_document,
    hex_to_rgb_query,
    hex_to_rgb_body,
    rgb_to_hex_query,
    rgb_to_hex_body,
    process_hex_to_rgb,
    process_rgb_to_hex,
};
