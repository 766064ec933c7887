//! HTML 解析，基於 scraper
//!
//! `scraper::Html` 不是 `Send`，只在同步函式內使用，不要跨 `.await` 持有。

use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

pub struct HtmlDocument {
    document: Html,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
        }
    }

    fn select_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match selector(css) {
            Some(sel) => self.document.select(&sel).collect(),
            None => Vec::new(),
        }
    }

    /// `<title>` 內容，缺少時為空字串
    pub fn title(&self) -> String {
        self.select_all("title")
            .first()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// `<meta name="...">` 的 content
    pub fn meta_content(&self, name: &str) -> Option<String> {
        self.select_all("meta[name]")
            .into_iter()
            .find(|el| {
                el.value()
                    .attr("name")
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .and_then(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
    }

    /// 指定屬性以 prefix 開頭的 meta 標籤，回傳該屬性值
    pub fn meta_attrs_with_prefix(&self, attr: &str, prefix: &str) -> Vec<String> {
        self.select_all("meta")
            .into_iter()
            .filter_map(|el| el.value().attr(attr))
            .filter(|v| v.starts_with(prefix))
            .map(str::to_string)
            .collect()
    }

    pub fn links(&self) -> Vec<String> {
        self.select_all("a[href]")
            .into_iter()
            .filter_map(|el| el.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty())
            .collect()
    }

    pub fn image_count(&self) -> usize {
        self.select_all("img").len()
    }

    /// 沒有 alt 或 alt 為空的圖片數量
    pub fn images_missing_alt(&self) -> usize {
        self.select_all("img")
            .into_iter()
            .filter(|img| img.value().attr("alt").map_or(true, |alt| alt.trim().is_empty()))
            .count()
    }

    pub fn has_element(&self, tag: &str) -> bool {
        !self.select_all(tag).is_empty()
    }

    /// type 屬性包含指定字串的 `<script>` 內容
    pub fn script_blocks(&self, type_contains: &str) -> Vec<String> {
        self.select_all("script[type]")
            .into_iter()
            .filter(|el| {
                el.value()
                    .attr("type")
                    .is_some_and(|t| t.to_ascii_lowercase().contains(type_contains))
            })
            .map(|el| el.text().collect::<String>())
            .collect()
    }

    pub fn style_blocks(&self) -> Vec<String> {
        self.select_all("style")
            .into_iter()
            .map(|el| el.text().collect::<String>())
            .collect()
    }

    /// 可見文字，排除 script/style/noscript
    pub fn visible_text(&self) -> String {
        let mut parts = Vec::new();
        for node in self.document.root_element().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node
                .parent()
                .and_then(|p| p.value().as_element().map(|e| e.name().to_string()))
                .is_some_and(|name| matches!(name.as_str(), "script" | "style" | "noscript"));
            let trimmed = text.trim();
            if !hidden && !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
        parts.join(" ")
    }
}
