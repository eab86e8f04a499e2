//! # 表示用フォーマットユーティリティ

use serde::Serialize;

/// 浮動小数点数を指定した小数桁で切り捨てる（四捨五入しない）
///
/// `decimals` が 0 以下の場合は整数部への切り捨てになる。
///
/// ```
/// use authsvc_shared::format::truncate_decimals;
///
/// assert_eq!(truncate_decimals(1.23456, 2), 1.23);
/// assert_eq!(truncate_decimals(-2.789, 1), -2.7);
/// assert_eq!(truncate_decimals(9.99, 0), 9.0);
/// ```
pub fn truncate_decimals(num: f64, decimals: i32) -> f64 {
    let factor = if decimals > 0 {
        10f64.powi(decimals)
    } else {
        1.0
    };
    (num * factor).trunc() / factor
}

/// 値をインデント付き JSON 文字列に変換する
///
/// 診断ログ用。シリアライズに失敗した場合はエラーメッセージを返す。
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("<serialization failed: {e}>"))
}
