use crate::domain::model::FetchResponse;
use crate::domain::ports::{TextGenerator, WebFetcher};
use crate::utils::error::{Result, ScanError};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// 依網址回傳固定內容，未登錄的網址回 404
#[derive(Default)]
pub struct PageFetcher {
    pages: HashMap<String, (u16, String)>,
    unreachable: bool,
}

impl PageFetcher {
    pub fn with_page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages
            .insert(url.trim_end_matches('/').to_string(), (status, body.to_string()));
        self
    }

    pub fn unreachable() -> Self {
        Self {
            pages: HashMap::new(),
            unreachable: true,
        }
    }
}

#[async_trait]
impl WebFetcher for PageFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        if self.unreachable {
            return Err(ScanError::TimeoutError {
                operation: format!("GET {}", url),
                seconds: 30,
            });
        }
        let (status, body) = self
            .pages
            .get(url.trim_end_matches('/'))
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(FetchResponse {
            url: url.to_string(),
            status,
            headers: BTreeMap::from([("content-type".to_string(), "text/html".to_string())]),
            body,
        })
    }
}

/// 記錄收到的 prompt，回傳固定文字或錯誤
pub struct RecordingGenerator {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(ScanError::generation)
    }
}

pub const HOMEPAGE: &str = r#"<html><head>
    <title>Acme Coffee Roasters</title>
    <meta name="description" content="Fresh roasted coffee delivered">
    <meta name="viewport" content="width=device-width">
    <meta property="og:title" content="Acme">
    <script type="application/ld+json">{"@type": "Organization"}</script>
</head><body>
    <nav><a href="/shop">Shop</a><a href="https://elsewhere.org/">Partner</a></nav>
    <main><p>Coffee coffee coffee beans beans grinders</p></main>
    <img src="logo.png">
</body></html>"#;
