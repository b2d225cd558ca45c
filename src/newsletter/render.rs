use std::fmt::Write as _;

use chrono::Utc;

use crate::models::SourceKind;

use super::NewsletterContent;

const STYLE: &str = r#"
  body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
         max-width: 600px; margin: 0 auto; padding: 20px; background: #f5f5f5; }
  .container { background: white; border-radius: 12px; padding: 30px;
               box-shadow: 0 2px 8px rgba(0,0,0,0.1); }
  .greeting { font-size: 20px; color: #333; margin-bottom: 10px; }
  .intro { color: #666; margin-bottom: 30px; line-height: 1.6; }
  .section-title { font-size: 14px; color: #888; text-transform: uppercase;
                   letter-spacing: 1px; margin: 30px 0 15px 0; padding-bottom: 8px;
                   border-bottom: 2px solid #eee; }
  .featured-article { margin-bottom: 25px; padding: 20px; border-radius: 8px;
                      background: #fafafa; border-left: 4px solid #ddd; }
  .source-badge { display: inline-block; font-size: 12px; padding: 4px 10px;
                  border-radius: 12px; color: white; margin-bottom: 10px; }
  .article-title { font-size: 17px; font-weight: 600; color: #333;
                   margin-bottom: 10px; line-height: 1.4; }
  .article-summary { color: #555; line-height: 1.7; margin-bottom: 12px; }
  .read-more { color: #1a73e8; text-decoration: none; font-weight: 500; }
  .source-header { font-size: 13px; color: #666; margin: 12px 0 8px 0; font-weight: 600; }
  .link-item { padding: 8px 0; border-bottom: 1px solid #f0f0f0; }
  .link-item a { color: #1a73e8; text-decoration: none; font-size: 14px; }
  .no-article { color: #999; font-style: italic; padding: 15px; text-align: center; }
"#;

fn accent_color(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Youtube => "#FF0000",
        SourceKind::Openai => "#10A37F",
        SourceKind::Anthropic => "#D97706",
        SourceKind::F1 => "#E10600",
    }
}

fn icon(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Youtube => "🎬",
        SourceKind::Openai => "🤖",
        SourceKind::Anthropic => "🧠",
        SourceKind::F1 => "🏎️",
    }
}

pub fn subject_line() -> String {
    format!("AI News Digest - {}", Utc::now().format("%B %d, %Y"))
}

fn greeting(preferred_name: &str) -> String {
    let name = preferred_name.trim();
    let name = if name.is_empty() { "there" } else { name };
    format!("Hey {}, here is your daily digest.", name)
}

const INTRO: &str = "Here are your top AI news articles from the past 24 hours.";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the subscriber-filtered newsletter as an HTML email body.
pub fn render_html(content: &NewsletterContent, preferred_name: &str) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><style>{STYLE}</style></head>\n<body>\n\
         <div class=\"container\">\n\
         <p class=\"greeting\">{}</p>\n\
         <p class=\"intro\">{INTRO}</p>\n\
         <div class=\"section-title\">🌟 Featured Articles</div>\n",
        escape(&greeting(preferred_name))
    );

    for kind in SourceKind::ALL {
        match content.featured.get(&kind) {
            Some(digest) => {
                let _ = write!(
                    html,
                    "<div class=\"featured-article\" style=\"border-left-color: {color};\">\n\
                     <span class=\"source-badge\" style=\"background: {color};\">{icon} {name}</span>\n\
                     <div class=\"article-title\">{title}</div>\n\
                     <p class=\"article-summary\">{summary}</p>\n\
                     <a class=\"read-more\" href=\"{url}\">Read article →</a>\n\
                     </div>\n",
                    color = accent_color(kind),
                    icon = icon(kind),
                    name = kind.display_name(),
                    title = escape(&digest.title),
                    summary = escape(&digest.summary),
                    url = escape(&digest.url),
                );
            }
            // Placeholder only when the source still shows up below.
            None if content.additional.contains_key(&kind) => {
                let _ = write!(
                    html,
                    "<div class=\"featured-article\">\n\
                     <span class=\"source-badge\" style=\"background: #ccc;\">{icon} {name}</span>\n\
                     <p class=\"no-article\">No featured article from {name} right now</p>\n\
                     </div>\n",
                    icon = icon(kind),
                    name = kind.display_name(),
                );
            }
            None => {}
        }
    }

    if !content.additional.is_empty() {
        html.push_str("<div class=\"section-title\">📚 More from Your Topics</div>\n");
        for kind in SourceKind::ALL {
            let Some(links) = content.additional.get(&kind) else {
                continue;
            };
            let _ = write!(
                html,
                "<div class=\"source-header\">{} {}</div>\n",
                icon(kind),
                kind.display_name()
            );
            for link in links {
                let _ = write!(
                    html,
                    "<div class=\"link-item\"><a href=\"{}\">{}</a></div>\n",
                    escape(&link.url),
                    escape(&link.title)
                );
            }
        }
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// Plain-text alternative body for the same content.
pub fn render_text(content: &NewsletterContent, preferred_name: &str) -> String {
    let rule = "=".repeat(50);
    let mut text = format!("{}\n\n{INTRO}\n\n", greeting(preferred_name));

    let _ = write!(text, "{rule}\nFEATURED ARTICLES\n{rule}\n\n");
    for kind in SourceKind::ALL {
        let Some(digest) = content.featured.get(&kind) else {
            continue;
        };
        let _ = write!(
            text,
            "{} {}\n{}\n{}\n\n{}\n\n{}\n\n",
            icon(kind),
            kind.display_name().to_uppercase(),
            "-".repeat(30),
            digest.title,
            digest.summary,
            digest.url
        );
    }

    if !content.additional.is_empty() {
        let _ = write!(text, "{rule}\nMORE FROM YOUR TOPICS\n{rule}\n\n");
        for kind in SourceKind::ALL {
            let Some(links) = content.additional.get(&kind) else {
                continue;
            };
            let _ = write!(
                text,
                "{} {}\n",
                icon(kind),
                kind.display_name().to_uppercase()
            );
            for link in links {
                let _ = write!(text, "  * {}\n    {}\n", link.title, link.url);
            }
            text.push('\n');
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use crate::models::Digest;
    use crate::newsletter::Link;

    use super::*;

    fn sample_content() -> NewsletterContent {
        let mut featured = BTreeMap::new();
        featured.insert(
            SourceKind::Openai,
            Digest {
                id: "openai:abc".to_string(),
                source_kind: SourceKind::Openai,
                source_item_key: "abc".to_string(),
                url: "https://openai.com/post".to_string(),
                title: "Models < tokens & more".to_string(),
                summary: "A summary.".to_string(),
                created_at: Utc::now(),
            },
        );
        let mut additional = BTreeMap::new();
        additional.insert(
            SourceKind::F1,
            vec![Link {
                title: "Race report".to_string(),
                url: "https://example.com/race".to_string(),
            }],
        );
        NewsletterContent {
            featured,
            additional,
        }
    }

    #[test]
    fn html_escapes_and_includes_sections() {
        let html = render_html(&sample_content(), "Alice");
        assert!(html.contains("Hey Alice, here is your daily digest."));
        assert!(html.contains("Models &lt; tokens &amp; more"));
        assert!(html.contains("More from Your Topics"));
        assert!(html.contains("https://example.com/race"));
    }

    #[test]
    fn blank_name_falls_back_to_there() {
        let text = render_text(&sample_content(), "  ");
        assert!(text.starts_with("Hey there,"));
        assert!(text.contains("FEATURED ARTICLES"));
        assert!(text.contains("Race report"));
    }
}
