use crate::domain::model::HomepageProfile;

/// 產生競爭者搜尋查詢的提示
pub fn competitor_query(profile: &HomepageProfile) -> String {
    format!(
        r#"You are a market research analyst.

Homepage information:
Title: {title}
Description: {description}
Keywords: {keywords}

Write one short, natural web search query (4 to 8 words) that a real person would type to find brands or organizations offering the same main product or service as this website.
- Do not use phrases such as "alternatives to", "websites like", "similar to" or "competitors of".
- Do not mention the website's own name or domain.
- Do not use quotes, search operators or special symbols.
- Reply with the query alone on a single line. No reasoning, no explanation, no extra text.

Examples of good queries:
hotel booking platforms
specialty coffee subscription services
restaurant review websites

Query:"#,
        title = profile.title,
        description = profile.description,
        keywords = profile.keywords.join(", "),
    )
}

/// 最終比較報告的提示範本
pub fn comparison_report(target: &str, competitors: &[&str], bundle_json: &str) -> String {
    let competitor_line = if competitors.is_empty() {
        "(none discovered; report on the main website alone)".to_string()
    } else {
        competitors.join(", ")
    };

    format!(
        r#"You are SeoScan, a senior SEO consultant.
Below are the audit results for the MAIN WEBSITE and its competitors.

MAIN WEBSITE: {target}
COMPETITORS: {competitor_line}

## Audit bundle (JSON)
Each record holds technical, content, ux and keyword_focus results. A result with "status": "error" means that audit could not be completed; say so and explain the aspect from best practice.

{bundle_json}

## Instructions
- Write a long, professional competitor audit report in Markdown, at least 1500 words.
- Open with an executive summary of at least 400 words on how the main website compares to its competitors.
- For each SEO aspect (robots.txt, sitemap, performance, structured data, accessibility, mobile, HTTP headers, redirects, keyword focus) explain what it is, why it matters, and compare the findings.
- Include a comparison table covering every site and every aspect.
- Give bullet lists of strengths and weaknesses for each site.
- Add a "Keyword Focus Analysis" section for every domain, listing and commenting on its main keywords.
- Finish with "Actionable Recommendations": a prioritized to-do list for the main website that references what competitors do better.
- Use rich Markdown: headings, tables and lists. Expand brief findings with best practices.
- Never use placeholder names such as "Competitor A" or "example.com". Only use the real domains listed above.
"#
    )
}

pub const TECHNICAL_ROLE: &str = "You are TechnicalAgent, a technical SEO expert. The findings cover robots.txt, sitemap, broken links, HTTP headers, redirects, crawlability and performance.";

pub const CONTENT_ROLE: &str = "You are ContentAgent, a content SEO expert. The findings cover structured data (JSON-LD, OpenGraph, Twitter cards) and the keywords found on the homepage.";

pub const UX_ROLE: &str = "You are UXAgent, a user experience and mobile SEO expert. The findings cover image alt text, navigation and main landmarks, the viewport tag and responsive styles.";

/// 讓稽核群組把檢查結果寫成說明文字
pub fn narrate_findings(role: &str, domain: &str, findings_json: &str) -> String {
    format!(
        r#"{role}

Domain: {domain}

Check results (JSON):
{findings_json}

For every check: first explain what it is and why it matters for SEO, then present the findings for this domain and clear recommendations. Never skip a check; if a check reports an error, explain the aspect from best practice. Use Markdown with headings, bullets and tables, at least 700 words.
"#
    )
}

/// 關鍵字焦點摘要
pub fn keyword_focus(domain: &str, keywords: &[String]) -> String {
    format!(
        r#"You are ContentAgent, a content SEO expert.

The most frequent words on the homepage of {domain}, most frequent first:
{keywords}

Summarize the keyword focus of this site: for each keyword give a brief explanation of what it signals about the site's topic and audience, then note any obvious gaps.
"#,
        keywords = keywords.join(", "),
    )
}

/// 從首頁內容萃取三個 SEO 關鍵字
pub fn content_keywords(page_excerpt: &str) -> String {
    format!(
        r#"You identify a website's main topics for SEO analysis.
Homepage HTML or text:

{page_excerpt}

List exactly 3 highly relevant SEO keywords (single words or short phrases) that best capture what this site is about.
Output only the keywords, comma-separated, with no extra text.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_prompt_embeds_profile() {
        let profile = HomepageProfile {
            title: "Bean Box".to_string(),
            description: "Coffee subscriptions".to_string(),
            keywords: vec!["bean".to_string(), "coffee".to_string()],
            error: None,
        };
        let prompt = competitor_query(&profile);
        assert!(prompt.contains("Title: Bean Box"));
        assert!(prompt.contains("Keywords: bean, coffee"));
    }

    #[test]
    fn test_report_prompt_lists_real_domains() {
        let prompt = comparison_report("a.com", &["b.com", "c.io"], "{}");
        assert!(prompt.contains("MAIN WEBSITE: a.com"));
        assert!(prompt.contains("COMPETITORS: b.com, c.io"));

        let alone = comparison_report("a.com", &[], "{}");
        assert!(alone.contains("none discovered"));
    }
}
