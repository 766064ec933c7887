use super::narrate;
use crate::app::checks::ux;
use crate::core::prompts;
use crate::domain::model::{CapabilityOutput, Domain};
use crate::domain::ports::{AuditCapability, TextGenerator, WebFetcher};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// 無障礙與行動裝置檢查
pub struct UxAudit {
    fetcher: Arc<dyn WebFetcher>,
    narrator: Option<Arc<dyn TextGenerator>>,
}

impl UxAudit {
    pub fn new(fetcher: Arc<dyn WebFetcher>) -> Self {
        Self {
            fetcher,
            narrator: None,
        }
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn TextGenerator>) -> Self {
        self.narrator = Some(narrator);
        self
    }
}

#[async_trait]
impl AuditCapability for UxAudit {
    fn name(&self) -> &str {
        "ux"
    }

    async fn audit(&self, domain: &Domain) -> Result<CapabilityOutput> {
        let details = match self.fetcher.get_ok(&domain.homepage_url()).await {
            Ok(page) => json!({
                "accessibility": ux::accessibility(&page.body),
                "mobile": ux::mobile(&page.body),
            }),
            Err(e) => {
                let failed = json!({ "error": e.to_string() });
                json!({ "accessibility": failed.clone(), "mobile": failed })
            }
        };

        narrate(self.narrator.as_deref(), prompts::UX_ROLE, domain, details).await
    }
}
