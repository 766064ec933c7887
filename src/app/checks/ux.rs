use crate::adapters::html::HtmlDocument;
use serde_json::{json, Value};

pub fn accessibility(markup: &str) -> Value {
    let doc = HtmlDocument::parse(markup);
    json!({
        "images": doc.image_count(),
        "img_no_alt": doc.images_missing_alt(),
        "has_nav": doc.has_element("nav"),
        "has_main": doc.has_element("main"),
    })
}

/// viewport 設定與 `<style>` 中的響應式提示
pub fn mobile(markup: &str) -> Value {
    let doc = HtmlDocument::parse(markup);
    let viewport = doc
        .meta_content("viewport")
        .unwrap_or_else(|| "Missing".to_string());
    let responsive_css = doc
        .style_blocks()
        .iter()
        .any(|css| css.contains("max-width") || css.contains("@media"));

    json!({
        "viewport": viewport,
        "responsive_css": responsive_css,
    })
}
