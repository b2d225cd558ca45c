mod curator;
mod summarizer;

pub use curator::GeminiCurator;
pub use summarizer::GeminiSummarizer;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Digest;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Title and summary produced for one featured item.
#[derive(Debug, Clone, Deserialize)]
pub struct DigestOutput {
    pub title: String,
    pub summary: String,
}

#[async_trait]
pub trait Summarize: Send + Sync {
    async fn summarize(&self, title: &str, content: &str, kind_label: &str)
        -> Result<DigestOutput>;
}

/// Orders digest ids best-first. Callers fall back to recency when ranking
/// fails or returns unknown ids.
#[async_trait]
pub trait RankDigests: Send + Sync {
    async fn rank(&self, digests: &[Digest]) -> Result<Vec<String>>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Single-turn text generation against the Gemini REST API.
async fn generate_text(client: &Client, api_key: &str, prompt: String) -> Result<String> {
    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part { text: prompt }],
        }],
    };

    let url = format!("{}/{}:generateContent", GEMINI_API_URL, GEMINI_MODEL);
    let response = client
        .post(&url)
        .query(&[("key", api_key)])
        .header("content-type", "application/json")
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(AppError::SummarizerApi(format!("API error: {}", error_text)));
    }

    let generated: GenerateResponse = response.json().await?;
    let text = generated
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AppError::SummarizerApi("empty model response".to_string()));
    }
    Ok(text)
}

/// Models often wrap JSON answers in markdown code fences.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_code_fences() {
        let fenced = "```json\n{\"title\": \"t\"}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"title\": \"t\"}");
        assert_eq!(strip_code_fences("plain"), "plain");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }
}
