use crate::adapters::html::HtmlDocument;
use crate::domain::model::Domain;
use crate::domain::ports::WebFetcher;
use crate::utils::error::Result;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

pub const DEFAULT_PAGESPEED_URL: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

static SITEMAP_LOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<loc>\s*(.*?)\s*</loc>").expect("loc pattern"));

fn site_url(domain: &Domain, path: &str) -> String {
    format!("{}{}", domain.homepage_url().trim_end_matches('/'), path)
}

/// robots.txt 中非空、非註解的規則行
pub fn robots_rules(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub async fn robots_txt(fetcher: &dyn WebFetcher, domain: &Domain) -> Result<Value> {
    let url = site_url(domain, "/robots.txt");
    let response = fetcher.get(&url).await?;
    if response.status != 200 {
        return Ok(json!({"robots_txt": "Not found", "status": response.status}));
    }

    let rules = robots_rules(&response.body);
    let sitemaps: Vec<&str> = rules
        .iter()
        .filter(|r| r.to_ascii_lowercase().starts_with("sitemap:"))
        .filter_map(|r| r.split_once(':').map(|(_, v)| v.trim()))
        .collect();

    Ok(json!({
        "url": url,
        "rules_count": rules.len(),
        "sitemaps": sitemaps,
        "sample": rules.iter().take(5).collect::<Vec<_>>(),
    }))
}

pub fn sitemap_locations(xml: &str) -> Vec<String> {
    SITEMAP_LOC
        .captures_iter(xml)
        .map(|c| c[1].to_string())
        .collect()
}

/// 依序嘗試 /sitemap.xml 與 /sitemap_index.xml
pub async fn sitemap(fetcher: &dyn WebFetcher, domain: &Domain) -> Result<Value> {
    for path in ["/sitemap.xml", "/sitemap_index.xml"] {
        let url = site_url(domain, path);
        match fetcher.get(&url).await {
            Ok(response) if response.status == 200 => {
                let urls = sitemap_locations(&response.body);
                return Ok(json!({
                    "sitemap_url": url,
                    "num_urls": urls.len(),
                    "sample_urls": urls.iter().take(5).collect::<Vec<_>>(),
                }));
            }
            Ok(response) => tracing::debug!("{} -> {}", url, response.status),
            Err(e) => tracing::debug!("{} failed: {}", url, e),
        }
    }
    Ok(json!({"sitemap": "Not found"}))
}

/// 首頁中與起始網址同主機的連結（排序、去重）
pub fn same_host_links(start: &Url, markup: &str) -> Vec<String> {
    let doc = HtmlDocument::parse(markup);
    let links: BTreeSet<String> = doc
        .links()
        .iter()
        .filter_map(|href| start.join(href).ok())
        .filter(|u| u.host_str() == start.host_str())
        .map(|mut u| {
            u.set_fragment(None);
            u.to_string()
        })
        .collect();
    links.into_iter().collect()
}

/// 檢查首頁與前 max_pages 個站內連結
pub async fn broken_links(
    fetcher: &dyn WebFetcher,
    domain: &Domain,
    max_pages: usize,
) -> Result<Value> {
    let start_url = domain.homepage_url();
    let homepage = fetcher.get_ok(&start_url).await?;
    let start = Url::parse(&homepage.url)?;

    let mut pages = vec![start.to_string()];
    pages.extend(
        same_host_links(&start, &homepage.body)
            .into_iter()
            .filter(|l| *l != start.as_str())
            .take(max_pages),
    );

    let mut broken = Vec::new();
    for page in &pages {
        match fetcher.get(page).await {
            Ok(response) if response.status >= 400 => {
                broken.push(json!({"url": page, "status": response.status}))
            }
            Ok(_) => {}
            Err(_) => broken.push(json!({"url": page, "status": "error"})),
        }
    }

    Ok(json!({
        "pages_checked": pages.len(),
        "broken_links_count": broken.len(),
        "broken_links": broken.into_iter().take(10).collect::<Vec<_>>(),
    }))
}

pub async fn http_headers(fetcher: &dyn WebFetcher, domain: &Domain) -> Result<Value> {
    let response = fetcher.get(&domain.homepage_url()).await?;
    Ok(json!({"status": response.status, "headers": response.headers}))
}

/// http/https 與 www/非 www 四種組合的轉址結果
pub async fn redirects(fetcher: &dyn WebFetcher, domain: &Domain) -> Result<Value> {
    let base = domain.as_str();
    let variants = [
        format!("http://{}", base),
        format!("https://{}", base),
        format!("http://www.{}", base),
        format!("https://www.{}", base),
    ];

    let results = futures::future::join_all(variants.iter().map(|u| fetcher.get(u))).await;

    let mut map = serde_json::Map::new();
    for (variant, result) in variants.iter().zip(results) {
        let entry = match result {
            Ok(response) => json!({"status": response.status, "final_url": response.url}),
            Err(e) => json!({"error": e.to_string()}),
        };
        map.insert(variant.clone(), entry);
    }
    Ok(Value::Object(map))
}

/// robots 規則是否整站禁止，以及首頁狀態
pub async fn crawlability(
    fetcher: &dyn WebFetcher,
    domain: &Domain,
    robots: &Value,
) -> Result<Value> {
    let disallow_all = robots["sample"]
        .as_array()
        .map(|rules| {
            rules.iter().filter_map(Value::as_str).any(|rule| {
                rule.split_once(':').is_some_and(|(key, value)| {
                    key.trim().eq_ignore_ascii_case("disallow") && value.trim() == "/"
                })
            })
        })
        .unwrap_or(false);

    let homepage = fetcher.get(&domain.homepage_url()).await?;
    Ok(json!({
        "robots_allow_homepage": !disallow_all,
        "homepage_status": homepage.status,
    }))
}

/// Google PageSpeed Insights（桌面版、效能類別）
#[derive(Debug, Clone)]
pub struct PageSpeedInsights {
    api_key: Option<String>,
    base_url: String,
}

impl PageSpeedInsights {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_PAGESPEED_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn request_url(&self, domain: &Domain) -> Result<String> {
        let target = domain.homepage_url();
        let mut params = vec![
            ("url", target.as_str()),
            ("strategy", "desktop"),
            ("category", "performance"),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.as_str()));
        }
        Ok(Url::parse_with_params(&self.base_url, &params)?.to_string())
    }

    pub async fn run(&self, fetcher: &dyn WebFetcher, domain: &Domain) -> Result<Value> {
        let response = fetcher.get_ok(&self.request_url(domain)?).await?;
        let data: Value = serde_json::from_str(&response.body)?;
        Ok(summarize_lighthouse(&data))
    }
}

pub fn summarize_lighthouse(data: &Value) -> Value {
    let lighthouse = &data["lighthouseResult"];
    let audits = &lighthouse["audits"];
    let display = |id: &str| audits[id]["displayValue"].as_str().unwrap_or("").to_string();

    json!({
        "performance_score": lighthouse["categories"]["performance"]["score"],
        "first_contentful_paint": display("first-contentful-paint"),
        "speed_index": display("speed-index"),
        "largest_contentful_paint": display("largest-contentful-paint"),
        "interactive": display("interactive"),
        "cumulative_layout_shift": display("cumulative-layout-shift"),
        "total_blocking_time": display("total-blocking-time"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robots_rules_skip_comments() {
        let body = "# comment\nUser-agent: *\n\nDisallow: /private\nSitemap: https://a.com/sitemap.xml\n";
        assert_eq!(
            robots_rules(body),
            vec!["User-agent: *", "Disallow: /private", "Sitemap: https://a.com/sitemap.xml"]
        );
    }

    #[test]
    fn test_sitemap_locations() {
        let xml = r#"<?xml version="1.0"?><urlset>
            <url><loc> https://a.com/ </loc></url>
            <url><LOC>https://a.com/about</LOC></url>
        </urlset>"#;
        assert_eq!(sitemap_locations(xml), vec!["https://a.com/", "https://a.com/about"]);
    }

    #[test]
    fn test_same_host_links() {
        let start = Url::parse("https://a.com/").unwrap();
        let markup = r##"<a href="/about">x</a><a href="https://a.com/about#team">y</a>
            <a href="https://other.com/">z</a><a href="contact">c</a>"##;
        assert_eq!(
            same_host_links(&start, markup),
            vec!["https://a.com/about", "https://a.com/contact"]
        );
    }

    #[test]
    fn test_pagespeed_request_url() {
        let psi = PageSpeedInsights::new(Some("k".to_string()));
        let url = psi.request_url(&Domain::parse("a.com").unwrap()).unwrap();
        assert!(url.starts_with(DEFAULT_PAGESPEED_URL));
        assert!(url.contains("url=https%3A%2F%2Fa.com"));
        assert!(url.contains("key=k"));
    }

    #[test]
    fn test_summarize_lighthouse() {
        let data = json!({
            "lighthouseResult": {
                "categories": {"performance": {"score": 0.91}},
                "audits": {"speed-index": {"displayValue": "1.2 s"}}
            }
        });
        let summary = summarize_lighthouse(&data);
        assert_eq!(summary["performance_score"], json!(0.91));
        assert_eq!(summary["speed_index"], "1.2 s");
        assert_eq!(summary["interactive"], "");
    }
}
