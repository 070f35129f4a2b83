// ── Page template ────────────────────────────────────────────────────────────

const PAGE_PREFIX: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>"#;

const PAGE_STYLE_BLOCK: &str = r#"</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f8f8f8;
        }
        .article {
            background: white;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
            padding: 30px;
            margin-bottom: 20px;
        }
        .title {
            font-size: 24px;
            font-weight: bold;
            margin-bottom: 10px;
            color: #1a1a1a;
            text-align: center;
        }
        .meta {
            font-size: 14px;
            color: #888;
            margin-bottom: 20px;
            text-align: center;
        }
        .content {
            font-size: 16px;
            line-height: 1.8;
            color: #333;
        }
        .content p {
            margin-bottom: 16px;
            text-align: justify;
        }
        .image-container {
            margin: 20px 0;
            text-align: center;
        }
        .image-container img {
            max-width: 100%;
            height: auto;
            border-radius: 4px;
            box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
        }
        .copyright {
            margin-top: 30px;
            padding-top: 20px;
            border-top: 1px solid #eee;
            font-size: 12px;
            color: #999;
            text-align: center;
        }
        @media (max-width: 600px) {
            body {
                padding: 15px;
            }
            .article {
                padding: 20px;
            }
            .title {
                font-size: 20px;
            }
        }
    </style>
</head>
<body>
    <div class="article">
        <h1 class="title">"#;

const PAGE_META_OPEN: &str = r#"</h1>
        <div class="meta">"#;

const PAGE_CONTENT_OPEN: &str = r#"</div>
        <div class="content">"#;

const PAGE_FOOTER_OPEN: &str = r#"
        </div>
        <div class="copyright">
            <p>本文内容来源于BBC中文网，如有侵权请联系必删</p>
            <p>Copyright "#;

const PAGE_FOOTER_CLOSE: &str = r#" BBC. 保留所有权利。</p>
        </div>
    </div>
</body>
</html>"#;

/// How many paragraphs accumulate before the next inline image is inserted.
const PARAGRAPHS_PER_IMAGE: std::ops::RangeInclusive<usize> = 5..=7;

// ── Rendering ────────────────────────────────────────────────────────────────

/// Render the standalone article page. Content lines become paragraphs; the
/// first image leads the article and the remaining ones are interleaved after
/// every fifth paragraph. Title, time and paragraph text are inserted
/// verbatim.
pub fn render_article(title: &str, time: &str, content: &str, image_urls: &[String]) -> String {
    let mut html = String::new();
    html.push_str(PAGE_PREFIX);
    html.push_str(title);
    html.push_str(PAGE_STYLE_BLOCK);
    html.push_str(title);
    html.push_str(PAGE_META_OPEN);
    html.push_str(time);
    html.push_str(PAGE_CONTENT_OPEN);

    let mut image_index = 0;
    let mut paragraph_count = 0;

    if !image_urls.is_empty() {
        push_image_block(&mut html, &image_urls[image_index], "头图");
        image_index += 1;
    }

    for paragraph in content.split('\n') {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        html.push_str(&format!("<p>{}</p>", paragraph));
        paragraph_count += 1;

        if image_index < image_urls.len() && PARAGRAPHS_PER_IMAGE.contains(&paragraph_count) {
            push_image_block(&mut html, &image_urls[image_index], "配图");
            image_index += 1;
            paragraph_count = 0;
        }
    }

    html.push_str(PAGE_FOOTER_OPEN);
    html.push_str(&copyright_year(time));
    html.push_str(PAGE_FOOTER_CLOSE);
    html
}

fn push_image_block(html: &mut String, url: &str, alt: &str) {
    html.push_str(&format!(
        "\n            <div class=\"image-container\">\n                <img src=\"{}\" alt=\"{}\">\n            </div>",
        url, alt
    ));
}

/// Leading four characters of the timestamp; the year in every time format
/// the service produces.
fn copyright_year(time: &str) -> String {
    time.chars().take(4).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_structure() {
        let html = render_article("标题", "2025年08月25日 10:00:00", "", &[]);
        assert!(html.starts_with("\n<!DOCTYPE html>"));
        assert!(html.ends_with("</html>"));
        assert!(html.contains("<title>标题</title>"));
        assert!(html.contains("<h1 class=\"title\">标题</h1>"));
        assert!(html.contains("<div class=\"meta\">2025年08月25日 10:00:00</div>"));
        assert!(html.contains("本文内容来源于BBC中文网，如有侵权请联系必删"));
        assert!(html.contains("Copyright 2025 BBC. 保留所有权利。"));
    }

    #[test]
    fn test_zero_images_renders_no_image_blocks() {
        let html = render_article("标题", "2025年08月25日 10:00:00", "第一段\n第二段\n", &[]);
        assert!(!html.contains("<div class=\"image-container\">"));
        assert!(html.contains("<p>第一段</p><p>第二段</p>"));
    }

    #[test]
    fn test_single_image_becomes_header_only() {
        let images = vec!["https://ichef.bbci.co.uk/a.jpg".to_string()];
        let html = render_article("标题", "2025年08月25日 10:00:00", "第一段\n第二段\n", &images);
        assert_eq!(
            html.matches("<div class=\"image-container\">").count(),
            1
        );
        assert!(html.contains("<img src=\"https://ichef.bbci.co.uk/a.jpg\" alt=\"头图\">"));
        assert!(!html.contains("alt=\"配图\""));
        // Header image precedes the first paragraph.
        let image_at = html.find("alt=\"头图\"").unwrap();
        let paragraph_at = html.find("<p>第一段</p>").unwrap();
        assert!(image_at < paragraph_at);
    }

    #[test]
    fn test_inline_image_after_fifth_paragraph() {
        let images = vec![
            "https://ichef.bbci.co.uk/a.jpg".to_string(),
            "https://ichef.bbci.co.uk/b.jpg".to_string(),
        ];
        let content = "段1\n段2\n段3\n段4\n段5\n段6\n";
        let html = render_article("标题", "2025年08月25日 10:00:00", content, &images);
        assert!(html.contains(
            "<p>段5</p>\n            <div class=\"image-container\">\n                <img src=\"https://ichef.bbci.co.uk/b.jpg\" alt=\"配图\">"
        ));
        let inline_at = html.find("alt=\"配图\"").unwrap();
        let sixth_at = html.find("<p>段6</p>").unwrap();
        assert!(inline_at < sixth_at);
    }

    #[test]
    fn test_paragraph_counter_resets_after_insertion() {
        let images = vec![
            "https://x/h.jpg".to_string(),
            "https://x/i1.jpg".to_string(),
            "https://x/i2.jpg".to_string(),
        ];
        let content = (1..=12)
            .map(|n| format!("段{}\n", n))
            .collect::<String>();
        let html = render_article("标题", "2025年08月25日 10:00:00", &content, &images);
        // Header plus one inline after paragraph 5 and one after paragraph 10.
        assert_eq!(html.matches("alt=\"配图\"").count(), 2);
        assert!(html.contains("<p>段5</p>\n            <div class=\"image-container\">"));
        assert!(html.contains("<p>段10</p>\n            <div class=\"image-container\">"));
    }

    #[test]
    fn test_images_stop_when_exhausted() {
        let images = vec!["https://x/only.jpg".to_string()];
        let content = (1..=10)
            .map(|n| format!("段{}\n", n))
            .collect::<String>();
        let html = render_article("标题", "2025年08月25日 10:00:00", &content, &images);
        assert!(html.contains("alt=\"头图\""));
        assert!(!html.contains("alt=\"配图\""));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let html = render_article("标题", "2025年08月25日 10:00:00", "甲\n\n   \n乙", &[]);
        assert!(html.contains("<p>甲</p><p>乙</p>"));
    }

    #[test]
    fn test_copyright_year() {
        assert_eq!(copyright_year("2025年08月25日 10:00:00"), "2025");
        assert_eq!(copyright_year("Mon, 25 Aug 2025 08:00:00 GMT"), "Mon,");
        assert_eq!(copyright_year("25"), "25");
        assert_eq!(copyright_year(""), "");
    }
}
