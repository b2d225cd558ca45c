use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::db::Repository;
use crate::error::Result;
use crate::models::{NewSubscriber, TopicFlags};

/// Outcome of one subscriber import pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub upserted: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Fetch the published-sheet CSV and upsert subscribers keyed on email.
/// Expected columns (case-insensitive): email, preferred_name, youtube,
/// openai, anthropic, f1. A blank topic cell means opted in.
pub async fn import_subscribers(repo: &Repository, csv_url: &str) -> Result<ImportReport> {
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client");

    let response = client.get(csv_url).send().await?;
    if !response.status().is_success() {
        return Err(anyhow::anyhow!(
            "Failed to fetch subscriber CSV: HTTP {}",
            response.status()
        )
        .into());
    }
    let content = response.text().await?;

    let mut report = ImportReport::default();
    for sub in parse_subscriber_csv(&content) {
        match sub {
            Some(sub) => {
                let email = sub.email.clone();
                match repo.upsert_subscriber(sub).await {
                    Ok(()) => report.upserted += 1,
                    Err(e) => {
                        report.errors += 1;
                        tracing::warn!("Failed to upsert subscriber {}: {}", email, e);
                    }
                }
            }
            None => report.skipped += 1,
        }
    }

    tracing::info!(
        "Subscriber import: {} upserted, {} skipped, {} errors",
        report.upserted,
        report.skipped,
        report.errors
    );
    Ok(report)
}

/// Parse CSV rows into subscribers. Rows without a plausible email yield
/// `None` so the caller can count skips.
fn parse_subscriber_csv(content: &str) -> Vec<Option<NewSubscriber>> {
    let mut rows = parse_csv(content).into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header
        .iter()
        .map(|h| h.trim().to_lowercase().replace([' ', '-'], "_"))
        .collect();
    let col = |name: &str| header.iter().position(|h| h == name);

    let email_col = col("email");
    let name_col = col("preferred_name");
    let youtube_col = col("youtube");
    let openai_col = col("openai");
    let anthropic_col = col("anthropic");
    let f1_col = col("f1");

    let field = |row: &[String], idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| row.get(i)).map(|s| s.trim().to_string())
    };

    rows.map(|row| {
        let email = field(&row, email_col).unwrap_or_default();
        if email.is_empty() || !email.contains('@') {
            return None;
        }
        let preferred_name = match field(&row, name_col) {
            Some(name) if !name.is_empty() => name,
            _ => "there".to_string(),
        };
        Some(NewSubscriber {
            email,
            preferred_name,
            topics: TopicFlags {
                youtube: parse_flag(field(&row, youtube_col)),
                openai: parse_flag(field(&row, openai_col)),
                anthropic: parse_flag(field(&row, anthropic_col)),
                f1: parse_flag(field(&row, f1_col)),
            },
            active: true,
        })
    })
    .collect()
}

/// Blank means opted in; otherwise accept the usual true/false spellings.
fn parse_flag(value: Option<String>) -> bool {
    match value.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(v) => matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "y"),
    }
}

/// Minimal CSV reader: comma separated, double-quoted fields with `""`
/// escapes, CRLF tolerant. The published sheet never needs more.
fn parse_csv(content: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => row.push(std::mem::take(&mut field)),
                '\r' => {}
                '\n' => {
                    row.push(std::mem::take(&mut field));
                    if !(row.len() == 1 && row[0].is_empty()) {
                        rows.push(std::mem::take(&mut row));
                    } else {
                        row.clear();
                    }
                }
                _ => field.push(c),
            }
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_topic_flags() {
        let csv = "Email,Preferred Name,youtube,openai,anthropic,f1\n\
                   alice@example.com,Alice,true,false,yes,no\n\
                   bob@example.com,,,,,\n";
        let subs = parse_subscriber_csv(csv);
        assert_eq!(subs.len(), 2);

        let alice = subs[0].as_ref().unwrap();
        assert_eq!(alice.email, "alice@example.com");
        assert!(alice.topics.youtube);
        assert!(!alice.topics.openai);
        assert!(alice.topics.anthropic);
        assert!(!alice.topics.f1);

        // Blank cells mean opted in, missing name falls back.
        let bob = subs[1].as_ref().unwrap();
        assert_eq!(bob.preferred_name, "there");
        assert!(bob.topics.youtube && bob.topics.f1);
    }

    #[test]
    fn rows_without_email_are_skipped() {
        let csv = "email,preferred_name\n,NoEmail\nnot-an-email,Bad\n";
        let subs = parse_subscriber_csv(csv);
        assert_eq!(subs.len(), 2);
        assert!(subs.iter().all(|s| s.is_none()));
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let csv = "email,preferred_name\ncarol@example.com,\"Carol, PhD\"\n";
        let subs = parse_subscriber_csv(csv);
        assert_eq!(subs[0].as_ref().unwrap().preferred_name, "Carol, PhD");
    }
}
