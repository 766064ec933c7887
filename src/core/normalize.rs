use url::Url;

/// 不指向網站的 scheme，例如搜尋結果裡的 `mailto:` 連結
const NON_WEB_SCHEMES: [&str; 4] = ["mailto", "tel", "javascript", "data"];

/// scheme 比對不分大小寫
fn has_web_scheme(input: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// 補上 `https://`，已有 scheme 的網址原樣回傳
pub fn normalize(domain: &str) -> String {
    let domain = domain.trim();
    if has_web_scheme(domain) {
        return domain.to_string();
    }
    let bare = domain.strip_prefix('/').unwrap_or(domain);
    format!("https://{}", bare)
}

/// 帶 scheme 的網址直接解析，只接受 http/https；沒有 scheme 才補上 `https://`
fn parse_web_url(input: &str) -> Option<Url> {
    let input = input.trim();
    match Url::parse(input) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        // `localhost:8080`、`example.com:443` 會被當成 scheme 解析
        Ok(url) if url.cannot_be_a_base() && !NON_WEB_SCHEMES.contains(&url.scheme()) => {
            Url::parse(&normalize(input)).ok()
        }
        Ok(_) => None,
        Err(_) => Url::parse(&normalize(input)).ok(),
    }
}

/// 取出網路位置（含埠號），去掉開頭的 `www.` 並轉小寫；非網站網址或解析失敗回傳空字串
pub fn canonical_host(url_or_domain: &str) -> String {
    let Some(url) = parse_web_url(url_or_domain) else {
        return String::new();
    };
    let Some(host) = url.host_str() else {
        return String::new();
    };

    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// 兩個正規化主機相同或互相包含時視為同一站台。
/// 子字串比對會誤判部分名稱（`ab.com` 與 `fab.com`），保留此行為。
pub fn same_site(a: &str, b: &str) -> bool {
    a == b || a.contains(b) || b.contains(a)
}
