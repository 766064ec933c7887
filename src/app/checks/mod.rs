// 個別檢查：每項回傳一段 JSON 結果，失敗時由呼叫端收成 {"error": ...}

pub mod content;
pub mod technical;
pub mod ux;

use crate::utils::error::Result;
use serde_json::{json, Value};

/// 檢查失敗只佔用自己的欄位，不影響同群組其他檢查
pub fn finding(check: &str, result: Result<Value>) -> Value {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("check {} failed: {}", check, e);
            json!({ "error": e.to_string() })
        }
    }
}
