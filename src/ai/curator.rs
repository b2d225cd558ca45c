use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::Digest;

use super::{generate_text, strip_code_fences, RankDigests};

const CURATOR_PROMPT: &str = r#"You are an expert AI news curator specializing in content ranking for AI professionals.

Your role is to analyze and rank AI-related news articles, research papers, and video content.

Ranking Criteria:
1. Technical depth and practical value
2. Novelty and significance of the content
3. Actionability and real-world applicability

Rank articles from most relevant (rank 1) to least relevant. Ensure each article has a unique rank.

IMPORTANT: Return your response as valid JSON with this exact format:
{"articles": [{"digest_id": "type:id", "rank": 1}]}"#;

#[derive(Debug, Deserialize)]
struct RankedList {
    articles: Vec<RankedArticle>,
}

#[derive(Debug, Deserialize)]
struct RankedArticle {
    digest_id: String,
    rank: u32,
}

pub struct GeminiCurator {
    client: Client,
    api_key: String,
}

impl GeminiCurator {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, api_key }
    }
}

#[async_trait]
impl RankDigests for GeminiCurator {
    async fn rank(&self, digests: &[Digest]) -> Result<Vec<String>> {
        if digests.is_empty() {
            return Ok(Vec::new());
        }

        let digest_list = digests
            .iter()
            .map(|d| {
                format!(
                    "ID: {}\nTitle: {}\nSummary: {}\nType: {}",
                    d.id,
                    d.title,
                    d.summary,
                    d.source_kind.display_name()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!(
            "{}\n\nRank these {} AI news digests:\n\n{}\n\n\
             Provide a rank (1-{}) for each article, ordered from most to least relevant.\n\n\
             Return ONLY valid JSON with this exact format:\n\
             {{\"articles\": [{{\"digest_id\": \"type:id\", \"rank\": 1}}]}}",
            CURATOR_PROMPT,
            digests.len(),
            digest_list,
            digests.len()
        );

        let response = generate_text(&self.client, &self.api_key, prompt).await?;
        let mut ranked: RankedList =
            serde_json::from_str(strip_code_fences(&response)).map_err(|e| {
                AppError::SummarizerApi(format!("unparseable ranking response: {}", e))
            })?;
        ranked.articles.sort_by_key(|a| a.rank);
        Ok(ranked.articles.into_iter().map(|a| a.digest_id).collect())
    }
}
