use crate::adapters::html::HtmlDocument;
use crate::core::profiler::word_tokens;
use crate::core::prompts;
use crate::domain::ports::TextGenerator;
use crate::utils::error::Result;
use serde_json::{json, Value};
use std::collections::HashMap;

pub const DEFAULT_KEYWORD_LIMIT: usize = 10;
const LLM_EXCERPT_CHARS: usize = 2000;
const SCHEMA_SAMPLE_CHARS: usize = 200;

/// JSON-LD、OpenGraph 與 Twitter card 標記
pub fn structured_data(markup: &str) -> Value {
    let doc = HtmlDocument::parse(markup);
    let jsonld = doc.script_blocks("ld+json");
    let og_tags = doc.meta_attrs_with_prefix("property", "og:");
    let twitter_tags = doc.meta_attrs_with_prefix("name", "twitter:");
    let sample_schema = jsonld
        .first()
        .map(|block| block.trim().chars().take(SCHEMA_SAMPLE_CHARS).collect::<String>());

    json!({
        "jsonld_blocks": jsonld.len(),
        "og_tags": og_tags,
        "twitter_tags": twitter_tags,
        "sample_schema": sample_schema,
    })
}

/// 可見文字中出現次數最多的詞（同次數依首次出現順序）
pub fn keyword_ranking(markup: &str, limit: usize) -> Vec<(String, usize)> {
    let text = HtmlDocument::parse(markup).visible_text();

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in word_tokens(&text) {
        let count = counts.entry(token.clone()).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| {
            let count = counts.get(&word).copied().unwrap_or(0);
            (word, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

pub fn keywords(markup: &str, limit: usize) -> Value {
    let top: Vec<Value> = keyword_ranking(markup, limit)
        .into_iter()
        .map(|(word, count)| json!([word, count]))
        .collect();
    json!({ "top_keywords": top })
}

pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().trim_matches('"').trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// 請生成服務從首頁前 2000 字元萃取三個關鍵字
pub async fn llm_keywords(generator: &dyn TextGenerator, markup: &str) -> Result<Value> {
    let excerpt: String = markup.chars().take(LLM_EXCERPT_CHARS).collect();
    let raw = generator.complete(&prompts::content_keywords(&excerpt)).await?;
    Ok(json!({ "llm_keywords": split_keywords(&raw) }))
}
