use std::fmt::Write;

use nd_core::Article;

/// Minimal HTML escaping for text and attribute positions.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Landing page: the static topic and source filter lists.
pub fn index_page(topics: &[&str], sources: &[&str]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>News Dashboard</title></head>\n<body>\n<h1>News Dashboard</h1>\n",
    );
    html.push_str("<h2>Topics</h2>\n<ul class=\"topics\">\n");
    for topic in topics {
        let _ = writeln!(html, "  <li class=\"topic-item\">{}</li>", escape(topic));
    }
    html.push_str("</ul>\n<h2>Sources</h2>\n<ul class=\"sources\">\n");
    for source in sources {
        let _ = writeln!(html, "  <li class=\"source-item\">{}</li>", escape(source));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

/// Article list for the word drill-down page.
pub fn articles_page(word: &str, articles: &[Article]) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\">");
    let _ = write!(html, "<title>Articles mentioning {}</title>", escape(word));
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>Articles mentioning \"{}\"</h1>", escape(word));
    if articles.is_empty() {
        html.push_str("<p>No matching articles.</p>\n");
    } else {
        html.push_str("<ul class=\"articles\">\n");
        for article in articles {
            let _ = writeln!(
                html,
                "  <li><a href=\"{}\">{}</a> <span class=\"source\">{}</span> <span class=\"date\">{}</span></li>",
                escape(&article.link),
                escape(&article.title),
                escape(&article.source),
                article.publish_date.format("%B %d, %Y"),
            );
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn index_page_lists_filters() {
        let html = index_page(&["Energy", "Water & Oceans"], &["BBC News"]);
        assert!(html.contains("Energy"));
        assert!(html.contains("Water &amp; Oceans"));
        assert!(html.contains("BBC News"));
    }

    #[test]
    fn articles_page_formats_dates() {
        let article = Article {
            title: "Wind farms expand".to_string(),
            summary: String::new(),
            link: "https://example.org/wind".to_string(),
            image: String::new(),
            source: "Grist".to_string(),
            topic1: "Energy".to_string(),
            topic2: String::new(),
            publish_date: Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap(),
        };
        let html = articles_page("wind", &[article]);
        assert!(html.contains("September 01, 2024"));
        assert!(html.contains("https://example.org/wind"));
    }
}
