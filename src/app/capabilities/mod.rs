//! 四個稽核能力群組，各自實作 `AuditCapability`
//!
//! 群組內的檢查同時執行，單一檢查失敗只會寫進自己的欄位。
//! 設定了 narrator 時，整包檢查結果交給生成服務寫成說明文字；
//! 說明失敗則整個能力視為失敗。

pub mod content;
pub mod keywords;
pub mod technical;
pub mod ux;

#[cfg(test)]
pub(crate) mod testing;

pub use content::ContentAudit;
pub use keywords::KeywordFocusAudit;
pub use technical::TechnicalAudit;
pub use ux::UxAudit;

use crate::core::prompts;
use crate::domain::model::{CapabilityOutput, Domain};
use crate::domain::ports::TextGenerator;
use crate::utils::error::Result;
use serde_json::Value;

pub(crate) async fn narrate(
    narrator: Option<&dyn TextGenerator>,
    role: &str,
    domain: &Domain,
    details: Value,
) -> Result<CapabilityOutput> {
    let Some(narrator) = narrator else {
        return Ok(CapabilityOutput::details(details));
    };

    let findings = serde_json::to_string_pretty(&details)?;
    let prompt = prompts::narrate_findings(role, domain.as_str(), &findings);
    let summary = narrator.complete(&prompt).await?;
    Ok(CapabilityOutput::narrated(summary.trim().to_string(), details))
}
