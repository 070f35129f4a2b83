use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::convert;

// ── Constants ────────────────────────────────────────────────────────────────

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// Root used to absolutize root-relative and bare-relative image paths.
const SITE_ROOT: &str = "https://www.bbc.com";

/// Article title selectors, current page layouts first, legacy ones after.
const TITLE_SELECTORS_RAW: &[&str] = &[
    "h1[tabindex='-1']",
    "h1.story-body__h1",
    "h1.bbc-title-lg",
    ".article-headline__text",
    ".story-body h1",
    "article h1",
    ".article__header h1",
    "#main-heading",
    ".vxp-media__headline",
];

/// Image selectors, most specific containers first, then lazy-load and
/// responsive variants, then meta tags, then catch-alls.
const IMAGE_SELECTORS_RAW: &[&str] = &[
    ".article__body-content img",
    ".story-body__inner img",
    ".article-body-container img",
    ".body-content-container img",
    "[data-component='image-block'] img",
    ".article__body img",
    ".body-text-card img",
    ".article-body__image-container img",
    "figure.image-block img",
    "figure.media-with-caption img",
    ".js-image-replace",
    "figure img.bbc-image",
    "figure img.js-image-replace",
    "figure img.sp-media-asset_img",
    ".article__inline-image img",
    ".article-figure__image img",
    ".image-block img",
    ".vxp-media__player img",
    ".image-and-copyright-container img",
    ".js-delayed-image-load",
    "picture source",
    ".responsive-image img",
    "img[data-src]",
    "img[data-delayed-src]",
    "meta[property='og:image']",
    "meta[name='twitter:image']",
    "article img",
    ".content img",
    "main img",
];

/// Body paragraph selectors, current layouts first.
const CONTENT_SELECTORS_RAW: &[&str] = &[
    "article[role='main'] p",
    ".story-body__inner p",
    ".article__body-content p",
    ".article-body-container p",
    "[data-component='text-block'] p",
    ".bbc-19j92fr p",
    ".story-body__inner div.mapped-include p",
    ".body-content-container p",
    ".article__body p",
    ".vxp-media__summary p",
];

/// Attributes probed on each matched element, in priority order. The first
/// one present with a non-empty value wins; the rest are ignored.
const IMAGE_ATTRS: &[&str] = &[
    "data-src",
    "src",
    "data-delayed-src",
    "data-original",
    "data-highres",
    "content",
    "srcset",
];

// ── Lazy static selectors ────────────────────────────────────────────────────

static TITLE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| parse_selectors(TITLE_SELECTORS_RAW));

static IMAGE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| parse_selectors(IMAGE_SELECTORS_RAW));

static CONTENT_SELECTORS: Lazy<Vec<Selector>> =
    Lazy::new(|| parse_selectors(CONTENT_SELECTORS_RAW));

/// Last-resort content selector: every paragraph inside any article element.
static ARTICLE_PARAGRAPHS: Lazy<Selector> = Lazy::new(|| Selector::parse("article p").unwrap());

static IMAGE_EXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(jpe?g|png|gif|webp)").unwrap());

fn parse_selectors(raw: &[&str]) -> Vec<Selector> {
    raw.iter().map(|s| Selector::parse(s).unwrap()).collect()
}

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("{0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("no article content found")]
    NoContent,
}

// ── Public result type ───────────────────────────────────────────────────────

/// Extraction result for one article page. `title` and `paragraphs` are
/// already converted to simplified Chinese; `image_urls` are absolute,
/// filtered to known image extensions and deduplicated in encounter order.
#[derive(Debug)]
pub struct ExtractedArticle {
    pub title: Option<String>,
    pub paragraphs: Vec<String>,
    pub image_urls: Vec<String>,
}

impl ExtractedArticle {
    /// Flattened content: the title line followed by a blank line (when a
    /// title was found), then one line per paragraph.
    pub fn content(&self) -> String {
        let mut content = String::new();
        if let Some(title) = &self.title {
            content.push_str(title);
            content.push_str("\n\n");
        }
        for paragraph in &self.paragraphs {
            content.push_str(paragraph);
            content.push('\n');
        }
        content
    }
}

// ── Public API ───────────────────────────────────────────────────────────────

pub async fn extract_article(url: &str) -> Result<ExtractedArticle, ExtractionError> {
    validate_url(url)?;
    let html = fetch_html(url).await?;
    extract_from_html(&html)
}

/// Split flattened content back into its non-empty trimmed lines.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ── URL validation ───────────────────────────────────────────────────────────

fn validate_url(url: &str) -> Result<(), ExtractionError> {
    let parsed =
        Url::parse(url).map_err(|_| ExtractionError::InvalidUrl("Invalid URL".to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(ExtractionError::InvalidUrl(
            "Only HTTP(S) URLs are supported".to_string(),
        )),
    }
}

// ── HTTP fetch ───────────────────────────────────────────────────────────────

async fn fetch_html(url: &str) -> Result<String, ExtractionError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        ACCEPT_LANGUAGE.parse().unwrap(),
    );

    let client = reqwest::ClientBuilder::new()
        .connect_timeout(std::time::Duration::from_secs(5))
        .timeout(std::time::Duration::from_secs(10))
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| ExtractionError::Request(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ExtractionError::Request(format!("timed out: {}", e))
        } else if e.is_connect() {
            ExtractionError::Request(format!("connect failed: {}", e))
        } else {
            ExtractionError::Request(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(ExtractionError::Status(response.status().as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| ExtractionError::Request(e.to_string()))
}

// ── Extraction core ──────────────────────────────────────────────────────────

/// Run the selector-fallback extraction over already-fetched page HTML.
/// Fails only when neither a title nor any body paragraph was found.
pub fn extract_from_html(html: &str) -> Result<ExtractedArticle, ExtractionError> {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let image_urls = extract_image_urls(&document);
    let paragraphs = extract_paragraphs(&document);

    if title.is_none() && paragraphs.is_empty() {
        return Err(ExtractionError::NoContent);
    }

    debug!(
        paragraphs = paragraphs.len(),
        images = image_urls.len(),
        "extracted article content"
    );

    Ok(ExtractedArticle {
        title: title.map(|t| convert::to_simplified(&t)),
        paragraphs: paragraphs
            .iter()
            .map(|p| convert::to_simplified(p))
            .collect(),
        image_urls,
    })
}

// ── Title ────────────────────────────────────────────────────────────────────

fn extract_title(document: &Html) -> Option<String> {
    for (raw, selector) in TITLE_SELECTORS_RAW.iter().zip(TITLE_SELECTORS.iter()) {
        if let Some(element) = document.select(selector).next() {
            let title = element.text().collect::<String>().trim().to_string();
            if !title.is_empty() {
                debug!(selector = raw, title = %title, "matched title selector");
                return Some(title);
            }
        }
    }
    None
}

// ── Images ───────────────────────────────────────────────────────────────────

fn extract_image_urls(document: &Html) -> Vec<String> {
    for (raw, selector) in IMAGE_SELECTORS_RAW.iter().zip(IMAGE_SELECTORS.iter()) {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();
        for element in document.select(selector) {
            if let Some(url) = image_url_from_element(element) {
                if seen.insert(url.clone()) {
                    urls.push(url);
                }
            }
        }
        if !urls.is_empty() {
            debug!(selector = raw, count = urls.len(), "matched image selector");
            return urls;
        }
    }
    Vec::new()
}

/// Pick the element's image URL from the first candidate attribute present,
/// then normalize it and require a known image extension.
fn image_url_from_element(element: ElementRef<'_>) -> Option<String> {
    let value = element.value();
    let (attr, raw) = IMAGE_ATTRS.iter().find_map(|attr| {
        value
            .attr(attr)
            .filter(|v| !v.is_empty())
            .map(|v| (*attr, v))
    })?;

    let candidate = if attr == "srcset" {
        first_srcset_url(raw)?
    } else {
        raw.to_string()
    };

    let url = normalize_image_url(&candidate);
    if IMAGE_EXT_RE.is_match(&url) {
        Some(url)
    } else {
        None
    }
}

/// First URL token of a srcset value (the leading candidate).
fn first_srcset_url(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .next()
        .and_then(|entry| entry.split_whitespace().next())
        .map(str::to_string)
}

/// Rewrite protocol-relative and root-relative forms to absolute URLs
/// against the fixed site root; absolute URLs pass through unchanged.
fn normalize_image_url(raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix("//") {
        format!("https://{}", rest)
    } else if raw.starts_with('/') {
        format!("{}{}", SITE_ROOT, raw)
    } else if !raw.starts_with("http") {
        format!("{}/{}", SITE_ROOT, raw)
    } else {
        raw.to_string()
    }
}

// ── Paragraphs ───────────────────────────────────────────────────────────────

fn extract_paragraphs(document: &Html) -> Vec<String> {
    for (raw, selector) in CONTENT_SELECTORS_RAW.iter().zip(CONTENT_SELECTORS.iter()) {
        let paragraphs = paragraph_texts(document, selector);
        if !paragraphs.is_empty() {
            debug!(
                selector = raw,
                count = paragraphs.len(),
                "matched content selector"
            );
            return paragraphs;
        }
    }
    debug!("falling back to generic article paragraphs");
    paragraph_texts(document, &ARTICLE_PARAGRAPHS)
}

fn paragraph_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────
