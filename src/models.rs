use serde::{Deserialize, Serialize};

// ── Query parameters ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub url: Option<String>,
    pub title: Option<String>,
    pub time: Option<String>,
}

// ── Response bodies ──────────────────────────────────────────────────────────

/// One entry of the headline listing. `image_url` is empty when the article
/// page could not be fetched or carried no usable image.
#[derive(Debug, Serialize)]
pub struct HeadlineItem {
    pub title: String,
    pub url: String,
    pub time: String,
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct TopNewsItem {
    pub title: String,
    pub time: String,
    pub content: String,
    pub image_urls: Vec<String>,
    pub paragraphs: Vec<String>,
    pub url: String,
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub title: String,
    pub time: String,
    pub content: String,
    pub image_urls: Vec<String>,
    pub paragraphs: Vec<String>,
    pub html: String,
}
