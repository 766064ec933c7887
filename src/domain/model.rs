use crate::core::normalize;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 正規化後的主機名稱（去除 scheme、開頭的 `www.`，小寫）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// 從網域或網址建立；無法取得主機名稱時回傳 None
    pub fn parse(input: &str) -> Option<Self> {
        let host = normalize::canonical_host(input);
        if host.is_empty() {
            None
        } else {
            Some(Self(host))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 可直接抓取的首頁網址
    pub fn homepage_url(&self) -> String {
        normalize::normalize(&self.0)
    }

    /// 相同或互為子字串即視為同一站台
    pub fn is_same_site(&self, other: &Domain) -> bool {
        normalize::same_site(&self.0, &other.0)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 首頁摘要，作為競爭者探索的訊號
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomepageProfile {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HomepageProfile {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// 依搜尋排名接受的競爭者，不含目標本身且不重複
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorSet(Vec<Domain>);

impl CompetitorSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, domain: Domain) {
        self.0.push(domain);
    }

    pub fn contains(&self, domain: &Domain) -> bool {
        self.0.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Domain> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Domain] {
        &self.0
    }

    pub fn hosts(&self) -> Vec<&str> {
        self.0.iter().map(Domain::as_str).collect()
    }
}

impl<'a> IntoIterator for &'a CompetitorSet {
    type Item = &'a Domain;
    type IntoIter = std::slice::Iter<'a, Domain>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// 單一能力呼叫的結果：成功內容或失敗原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ok { output: String },
    Error { reason: String },
}

impl Outcome {
    pub fn ok(output: impl Into<String>) -> Self {
        Outcome::Ok {
            output: output.into(),
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Outcome::Error {
            reason: reason.into(),
        }
    }

    pub fn from_result(result: Result<String>) -> Self {
        match result {
            Ok(output) => Outcome::Ok { output },
            Err(e) => Outcome::Error {
                reason: e.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error { .. })
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            Outcome::Ok { output } => Some(output),
            Outcome::Error { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Ok { .. } => None,
            Outcome::Error { reason } => Some(reason),
        }
    }
}

/// 一個網域的稽核結果，每個欄位獨立成功或失敗
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub technical: Outcome,
    pub content: Outcome,
    pub ux: Outcome,
    pub keyword_focus: Outcome,
}

impl AuditRecord {
    /// 整個網域稽核中斷時，四個欄位都標記同一原因
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            technical: Outcome::error(reason.clone()),
            content: Outcome::error(reason.clone()),
            ux: Outcome::error(reason.clone()),
            keyword_focus: Outcome::error(reason),
        }
    }

    pub fn slots(&self) -> [(&'static str, &Outcome); 4] {
        [
            ("technical", &self.technical),
            ("content", &self.content),
            ("ux", &self.ux),
            ("keyword_focus", &self.keyword_focus),
        ]
    }

    pub fn failure_count(&self) -> usize {
        self.slots().iter().filter(|(_, o)| o.is_error()).count()
    }
}

/// 交給報告合成的完整資料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditBundle {
    pub target: Domain,
    pub competitors: CompetitorSet,
    pub records: BTreeMap<Domain, AuditRecord>,
}

impl AuditBundle {
    /// 目標在前，其後依序為競爭者
    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        std::iter::once(&self.target).chain(self.competitors.iter())
    }

    /// 依鍵排序的巢狀 JSON
    pub fn to_sorted_json(&self) -> Result<String> {
        let value = sort_keys(serde_json::to_value(self)?);
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

fn sort_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let sorted: BTreeMap<String, serde_json::Value> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            serde_json::Value::Object(sorted.into_iter().collect())
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(sort_keys).collect())
        }
        other => other,
    }
}

/// 稽核能力的原始輸出；有文字摘要時以摘要為準
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityOutput {
    pub summary: Option<String>,
    pub details: serde_json::Value,
}

impl CapabilityOutput {
    pub fn details(details: serde_json::Value) -> Self {
        Self {
            summary: None,
            details,
        }
    }

    pub fn narrated(summary: String, details: serde_json::Value) -> Self {
        Self {
            summary: Some(summary),
            details,
        }
    }

    /// 轉成可嵌入 bundle 的純文字
    pub fn into_text(self) -> String {
        match self.summary {
            Some(summary) => summary,
            None => match self.details {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            },
        }
    }
}

/// 一次 HTTP 抓取的回應
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub url: String,
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 一次完整掃描的產出
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub bundle: AuditBundle,
    pub report: String,
    pub generated_at: DateTime<Utc>,
}
