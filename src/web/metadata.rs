//! Prefill values for a new website reference, scraped from the page
//!
//! Name comes from `og:title` then `<title>`, publication from
//! `og:site_name` then the last two labels of the host, date from the first
//! ten characters of `article:published_time`.

use crate::core::error::{Error, Result};
use regex::Regex;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

const FETCH_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub name: String,
    pub publication: String,
    pub date: String,
}

fn meta_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?is)<meta\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("valid regex"))
}

fn attribute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)([a-z:_-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
    })
}

fn title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"))
}

/// `property` -> `content` for every `<meta property=... content=...>` tag.
/// The first occurrence of a property wins.
fn meta_properties(html: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    for tag in meta_tag_regex().find_iter(html) {
        let mut property = None;
        let mut content = None;
        for caps in attribute_regex().captures_iter(tag.as_str()) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match caps[1].to_ascii_lowercase().as_str() {
                "property" => property = Some(value.to_ascii_lowercase()),
                "content" => content = Some(decode_entities(value)),
                _ => {}
            }
        }
        if let (Some(property), Some(content)) = (property, content) {
            properties.entry(property).or_insert(content);
        }
    }
    properties
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Last two labels of the URL's host, e.g. `www.sacbee.com` -> `sacbee.com`
pub fn root_domain(url: &str) -> String {
    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) else {
        return String::new();
    };
    let labels: Vec<&str> = host.split('.').collect();
    let start = labels.len().saturating_sub(2);
    labels[start..].join(".")
}

/// Extract prefill values from a page's HTML. Missing values are empty.
pub fn parse_page_metadata(html: &str, url: &str) -> PageMetadata {
    let properties = meta_properties(html);
    let non_empty = |key: &str| properties.get(key).filter(|v| !v.trim().is_empty()).cloned();

    let name = non_empty("og:title")
        .or_else(|| {
            title_regex()
                .captures(html)
                .map(|caps| decode_entities(caps[1].trim()))
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_default();

    let publication = non_empty("og:site_name").unwrap_or_else(|| root_domain(url));

    let date = non_empty("article:published_time")
        .map(|d| d.chars().take(10).collect())
        .unwrap_or_default();

    PageMetadata {
        name,
        publication,
        date,
    }
}

/// Download `url` and extract its metadata
pub async fn fetch_page_metadata(url: &str) -> Result<PageMetadata> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(|e| Error::Metadata(e.to_string()))?;

    debug!(url, "Fetching page metadata");
    let html = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| Error::Metadata(format!("{}: {}", url, e)))?
        .text()
        .await
        .map_err(|e| Error::Metadata(format!("{}: {}", url, e)))?;

    Ok(parse_page_metadata(&html, url))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"<html><head>
        <title>Ignored title | The Bee</title>
        <meta property="og:title" content="Budget gap widens &amp; grows">
        <meta content='The Sacramento Bee' property='og:site_name'/>
        <meta property="article:published_time" content="2023-04-01T08:00:00Z" />
        <meta name="description" content="not used">
    </head></html>"#;

    #[test]
    fn test_og_tags_win() {
        let meta = parse_page_metadata(ARTICLE, "https://www.sacbee.com/news/budget");
        assert_eq!(meta.name, "Budget gap widens & grows");
        assert_eq!(meta.publication, "The Sacramento Bee");
        assert_eq!(meta.date, "2023-04-01");
    }

    #[test]
    fn test_falls_back_to_title_and_domain() {
        let html = "<html><head><TITLE>\n  City council votes\n</TITLE></head></html>";
        let meta = parse_page_metadata(html, "https://news.example.co.uk/a");
        assert_eq!(meta.name, "City council votes");
        assert_eq!(meta.publication, "co.uk");
        assert_eq!(meta.date, "");
    }

    #[test]
    fn test_quoted_angle_bracket_in_content() {
        let html = r#"<meta property="og:title" content="Rents > wages, again"><meta property="og:site_name" content='A > B'>"#;
        let meta = parse_page_metadata(html, "https://example.com/a");
        assert_eq!(meta.name, "Rents > wages, again");
        assert_eq!(meta.publication, "A > B");
    }

    #[test]
    fn test_empty_page() {
        let meta = parse_page_metadata("", "not a url");
        assert_eq!(meta, PageMetadata::default());
    }

    #[test]
    fn test_root_domain() {
        assert_eq!(root_domain("https://www.sacbee.com/news"), "sacbee.com");
        assert_eq!(root_domain("http://localhost:8080/"), "localhost");
        assert_eq!(root_domain("::"), "");
    }
}
