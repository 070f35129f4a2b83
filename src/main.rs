use axum::{
    extract::Query,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Local};
use serde_json::json;

mod convert;
mod extract;
mod feed;
mod models;
mod render;

use models::{ContentQuery, HeadlineItem, NewsQuery, NewsResponse, TopNewsItem};

/// Display format for article timestamps, e.g. `2025年08月25日 14:30:00`.
const TIME_FORMAT: &str = "%Y年%m月%d日 %H:%M:%S";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let addr =
        std::env::var("ZHONGWEN_NEWS_ADDR").unwrap_or_else(|_| "0.0.0.0:8001".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app()).await.unwrap();
}

fn app() -> Router {
    Router::new()
        .route("/", get(headlines))
        .route("/api/news/top", get(top_articles))
        .route("/api/news/content", get(news_content))
        .route("/news", get(news_detail))
}

// ── Error responses ──────────────────────────────────────────────────────────

fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({"error": message.into()}))).into_response()
}

fn extraction_error_response(e: &extract::ExtractionError) -> Response {
    let status = match e {
        extract::ExtractionError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_json(status, e.to_string())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// Headline listing: the leading feed entries, each with its first article
/// image. An article that cannot be fetched keeps its slot with an empty
/// `image_url`.
async fn headlines() -> Response {
    let items = match feed::top_news().await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch feed");
            return error_json(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let mut headlines = Vec::with_capacity(items.len());
    for item in items {
        let image_url = match extract::extract_article(&item.link).await {
            Ok(article) => article.image_urls.first().cloned().unwrap_or_default(),
            Err(e) => {
                tracing::warn!(url = %item.link, error = %e, "headline image lookup failed");
                String::new()
            }
        };
        headlines.push(HeadlineItem {
            title: item.title,
            url: item.link,
            time: item.published,
            image_url,
        });
    }

    Json(headlines).into_response()
}

/// Full top-news listing. Articles that fail to fetch or extract are
/// dropped from the response rather than failing the request.
async fn top_articles() -> Response {
    let items = match feed::top_news().await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch feed");
            return error_json(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let mut articles = Vec::with_capacity(items.len());
    for item in items {
        let article = match extract::extract_article(&item.link).await {
            Ok(article) => article,
            Err(e) => {
                tracing::warn!(url = %item.link, error = %e, "skipping article");
                continue;
            }
        };
        let content = article.content();
        let html =
            render::render_article(&item.title, &item.published, &content, &article.image_urls);
        articles.push(TopNewsItem {
            title: item.title,
            time: item.published,
            paragraphs: extract::split_paragraphs(&content),
            content,
            image_urls: article.image_urls,
            url: item.link,
            html,
        });
    }

    Json(articles).into_response()
}

/// Extract one article by URL. The title falls back to the first content
/// paragraph and the timestamp is the current local time. Responds with
/// HTML unless the Accept header asks for JSON.
async fn news_content(headers: HeaderMap, Query(query): Query<ContentQuery>) -> Response {
    let url = match query.url.as_deref().filter(|v| !v.is_empty()) {
        Some(url) => url,
        None => return error_json(StatusCode::BAD_REQUEST, "URL parameter must not be empty"),
    };

    let article = match extract::extract_article(url).await {
        Ok(article) => article,
        Err(e) => return extraction_error_response(&e),
    };

    let content = article.content();
    let paragraphs = extract::split_paragraphs(&content);
    let title = paragraphs.first().cloned().unwrap_or_default();
    let time = Local::now().format(TIME_FORMAT).to_string();
    let html = render::render_article(&title, &time, &content, &article.image_urls);

    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if accept.contains("text/html") {
        Html(html).into_response()
    } else if accept.contains("application/json") {
        Json(NewsResponse {
            title,
            time,
            content,
            image_urls: article.image_urls,
            paragraphs,
            html,
        })
        .into_response()
    } else {
        Html(html).into_response()
    }
}

/// Article detail with caller-supplied title and RFC 3339 time, rendered
/// with the timestamp reformatted for display.
async fn news_detail(Query(query): Query<NewsQuery>) -> Response {
    let (url, title, time) = match (
        query.url.as_deref().filter(|v| !v.is_empty()),
        query.title.as_deref().filter(|v| !v.is_empty()),
        query.time.as_deref().filter(|v| !v.is_empty()),
    ) {
        (Some(url), Some(title), Some(time)) => (url, title, time),
        _ => {
            return error_json(StatusCode::BAD_REQUEST, "Missing required query parameters");
        }
    };

    let parsed = match DateTime::parse_from_rfc3339(time) {
        Ok(parsed) => parsed,
        Err(_) => return error_json(StatusCode::BAD_REQUEST, "Invalid time format"),
    };
    let formatted = parsed.format(TIME_FORMAT).to_string();

    let article = match extract::extract_article(url).await {
        Ok(article) => article,
        Err(e) => return extraction_error_response(&e),
    };

    let content = article.content();
    let html = render::render_article(title, &formatted, &content, &article.image_urls);

    Json(NewsResponse {
        title: title.to_string(),
        time: formatted,
        paragraphs: extract::split_paragraphs(&content),
        content,
        image_urls: article.image_urls,
        html,
    })
    .into_response()
}

// ── Tests ────────────────────────────────────────────────────────────────────
