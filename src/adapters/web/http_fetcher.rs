//! Implements ContentFetcherPort with reqwest + scraper.
//!
//! Fetches a page with a browser User-Agent and reduces it to visible body
//! text plus a handful of `<head>` metadata tags. Any failure (DNS, refused
//! connection, timeout, non-2xx, undecodable body) yields
//! [`PageContent::unavailable`] instead of an error.

use crate::domain::entities::truncate_chars;
use crate::domain::{PageContent, MAX_CONTENT_CHARS, MAX_META_VALUE_CHARS};
use crate::ports::ContentFetcherPort;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Subtrees dropped before text extraction.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "svg", "template",
];

/// Elements whose boundaries separate words.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "form", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre",
    "section", "table", "td", "th", "tr", "ul",
];

/// `<meta>` tags worth showing the model, by `property` or `name`.
const META_KEYS: &[&str] = &[
    "og:title",
    "og:description",
    "og:image",
    "og:url",
    "twitter:image",
];

pub struct HttpContentFetcher {
    client: reqwest::Client,
}

impl HttpContentFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> reqwest::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    async fn fetch_html(&self, url: &Url) -> reqwest::Result<String> {
        self.client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait::async_trait]
impl ContentFetcherPort for HttpContentFetcher {
    async fn fetch_page(&self, url: &Url) -> PageContent {
        match self.fetch_html(url).await {
            Ok(html) => {
                debug!(url = %url, html_len = html.len(), "fetched page");
                let page = extract_page(&html, url);
                info!(
                    url = %url,
                    text_chars = page.text.chars().count(),
                    metadata = page.metadata.len(),
                    "page reduced to text"
                );
                page
            }
            Err(e) => {
                warn!(url = %url, error = %e, "could not fetch page");
                PageContent::unavailable()
            }
        }
    }
}

/// Reduce an HTML document to metadata and capped, whitespace-collapsed
/// body text. `base` resolves relative image URLs.
pub fn extract_page(html: &str, base: &Url) -> PageContent {
    let document = Html::parse_document(html);

    let mut metadata = Vec::new();
    if let Some(title) = first_text(&document, "title") {
        metadata.push(("title".to_string(), title));
    }
    if let Ok(selector) = Selector::parse("meta[content]") {
        for element in document.select(&selector) {
            let attrs = element.value();
            let (Some(key), Some(content)) = (
                attrs.attr("property").or_else(|| attrs.attr("name")),
                attrs.attr("content"),
            ) else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let content = content.trim();
            if content.is_empty()
                || !META_KEYS.contains(&key.as_str())
                || metadata.iter().any(|(k, _)| *k == key)
            {
                continue;
            }
            let value = if key.ends_with("image") || key == "og:url" {
                base.join(content)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| content.to_string())
            } else {
                truncate_chars(&collapse_whitespace(content), MAX_META_VALUE_CHARS)
            };
            metadata.push((key, value));
        }
    }

    let mut raw = String::new();
    match Selector::parse("body")
        .ok()
        .and_then(|s| document.select(&s).next())
    {
        Some(body) => collect_text(body, &mut raw),
        None => collect_text(document.root_element(), &mut raw),
    }

    PageContent {
        text: truncate_chars(&collapse_whitespace(&raw), MAX_CONTENT_CHARS),
        metadata,
    }
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if SKIPPED_TAGS.contains(&name) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push(' ');
            }
            collect_text(child_el, out);
            if block {
                out.push(' ');
            }
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
