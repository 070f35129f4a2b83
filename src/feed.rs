use rss::Channel;
use tracing::debug;

use crate::convert;
use crate::extract;

// ── Constants ────────────────────────────────────────────────────────────────

const FEED_URL: &str = "https://feeds.bbci.co.uk/zhongwen/trad/rss.xml";

/// Number of feed entries served by the headline and top-news endpoints.
pub const TOP_NEWS_COUNT: usize = 3;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("feed returned status {0}")]
    Status(u16),
    #[error("failed to parse feed: {0}")]
    Parse(#[from] rss::Error),
}

// ── Feed item ────────────────────────────────────────────────────────────────

/// One feed entry. The title is already converted to simplified Chinese;
/// the publication time is kept verbatim as the feed supplied it.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub published: String,
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Fetch the feed and return its leading entries in feed order.
pub async fn top_news() -> Result<Vec<FeedItem>, FeedError> {
    let bytes = fetch_feed().await?;
    parse_feed(&bytes)
}

// ── Fetch and parse ──────────────────────────────────────────────────────────

async fn fetch_feed() -> Result<Vec<u8>, FeedError> {
    let client = reqwest::ClientBuilder::new()
        .connect_timeout(std::time::Duration::from_secs(5))
        .timeout(std::time::Duration::from_secs(10))
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(extract::USER_AGENT)
        .build()
        .map_err(|e| FeedError::Request(e.to_string()))?;

    let response = client.get(FEED_URL).send().await.map_err(|e| {
        if e.is_timeout() {
            FeedError::Request(format!("timed out: {}", e))
        } else {
            FeedError::Request(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(FeedError::Status(response.status().as_u16()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| FeedError::Request(e.to_string()))?;
    Ok(bytes.to_vec())
}

fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedItem>, FeedError> {
    let channel = Channel::read_from(bytes)?;
    let items: Vec<FeedItem> = channel
        .items()
        .iter()
        .take(TOP_NEWS_COUNT)
        .map(|item| FeedItem {
            title: convert::to_simplified(item.title().unwrap_or_default()),
            link: item.link().unwrap_or_default().to_string(),
            published: item.pub_date().unwrap_or_default().to_string(),
        })
        .collect();
    debug!(items = items.len(), "parsed feed");
    Ok(items)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_xml(items: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>BBC Chinese</title>
    <link>https://www.bbc.com/zhongwen/trad</link>
    <description>test feed</description>
    {}
  </channel>
</rss>"#,
            items
        )
    }

    #[test]
    fn test_parse_feed_takes_leading_entries() {
        let xml = feed_xml(
            r#"<item>
                 <title>國際新聞一</title>
                 <link>https://www.bbc.com/zhongwen/trad/articles/c1</link>
                 <pubDate>Mon, 25 Aug 2025 08:00:00 GMT</pubDate>
               </item>
               <item>
                 <title>國際新聞二</title>
                 <link>https://www.bbc.com/zhongwen/trad/articles/c2</link>
                 <pubDate>Mon, 25 Aug 2025 07:00:00 GMT</pubDate>
               </item>
               <item>
                 <title>國際新聞三</title>
                 <link>https://www.bbc.com/zhongwen/trad/articles/c3</link>
                 <pubDate>Mon, 25 Aug 2025 06:00:00 GMT</pubDate>
               </item>
               <item>
                 <title>國際新聞四</title>
                 <link>https://www.bbc.com/zhongwen/trad/articles/c4</link>
                 <pubDate>Mon, 25 Aug 2025 05:00:00 GMT</pubDate>
               </item>"#,
        );
        let items = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(items.len(), TOP_NEWS_COUNT);
        assert_eq!(items[0].title, "国际新闻一");
        assert_eq!(
            items[0].link,
            "https://www.bbc.com/zhongwen/trad/articles/c1"
        );
        assert_eq!(items[0].published, "Mon, 25 Aug 2025 08:00:00 GMT");
        assert_eq!(items[2].title, "国际新闻三");
    }

    #[test]
    fn test_parse_feed_keeps_short_feeds_whole() {
        let xml = feed_xml(
            r#"<item>
                 <title>單條新聞</title>
                 <link>https://www.bbc.com/zhongwen/trad/articles/c9</link>
                 <pubDate>Mon, 25 Aug 2025 04:00:00 GMT</pubDate>
               </item>"#,
        );
        let items = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "单条新闻");
    }

    #[test]
    fn test_parse_feed_defaults_missing_fields() {
        let xml = feed_xml("<item><title>只有標題</title></item>");
        let items = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(items[0].title, "只有标题");
        assert_eq!(items[0].link, "");
        assert_eq!(items[0].published, "");
    }

    #[test]
    fn test_parse_feed_rejects_invalid_xml() {
        assert!(matches!(
            parse_feed(b"definitely not xml"),
            Err(FeedError::Parse(_))
        ));
    }
}
