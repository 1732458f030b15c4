//! 色表現の変換（HEX ⇄ RGB）

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// RGB色
///
/// 各チャンネルは `u8` なので範囲外の値は構築できない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        RgbColor { r, g, b }
    }

    /// 生の値3つから構築する（HTTP層の文字列・数値をそのまま渡せる）
    pub fn from_raw(r: Option<&Value>, g: Option<&Value>, b: Option<&Value>) -> Option<Self> {
        Some(RgbColor::new(
            parse_channel(r)?,
            parse_channel(g)?,
            parse_channel(b)?,
        ))
    }

    /// `#RRGGBB` 形式に変換
    pub fn to_hex(&self) -> HexColor {
        HexColor(format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b))
    }

    /// CSS表記 `rgb(R, G, B)`
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// 正規化済みHEX色（`#` + 大文字6桁）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// 3桁・6桁、`#` の有無、大文字小文字を問わず受け付けて正規化する
    pub fn parse(input: &str) -> Option<Self> {
        hex_to_rgb(input).map(|rgb| rgb.to_hex())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// HEX色をRGBに変換（`#RRGGBB` / `#RGB`、`#` は省略可）
pub fn hex_to_rgb(input: &str) -> Option<RgbColor> {
    let digits = input.strip_prefix('#').unwrap_or(input);
    if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match digits.len() {
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some(RgbColor::new(r, g, b))
        }
        3 => {
            // 1桁を2回繰り返して1チャンネルにする（F -> FF）
            let expand = |d: &str| u8::from_str_radix(d, 16).ok().map(|v| v * 0x11);
            let r = expand(&digits[0..1])?;
            let g = expand(&digits[1..2])?;
            let b = expand(&digits[2..3])?;
            Some(RgbColor::new(r, g, b))
        }
        _ => None,
    }
}

/// RGB値3つをHEX色に変換
pub fn rgb_to_hex(r: Option<&Value>, g: Option<&Value>, b: Option<&Value>) -> Option<HexColor> {
    RgbColor::from_raw(r, g, b).map(|rgb| rgb.to_hex())
}

/// 1チャンネル分の生の値を解析
///
/// 数値、または10進数として読める文字列（前後の空白は無視）のみ受け付ける。
/// 整数かつ 0..=255 でなければ `None`。
pub fn parse_channel(raw: Option<&Value>) -> Option<u8> {
    let number = match raw? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };

    if !number.is_finite() || number.fract() != 0.0 || !(0.0..=255.0).contains(&number) {
        return None;
    }
    Some(number as u8)
}
