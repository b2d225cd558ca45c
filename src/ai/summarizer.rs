use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};

use super::{generate_text, strip_code_fences, DigestOutput, Summarize};

const DIGEST_PROMPT: &str = r#"You are an expert AI news analyst specializing in summarizing technical articles, research papers, and video content about artificial intelligence.

Your role is to create concise, informative digests that help readers quickly understand the key points and significance of AI-related content.

Guidelines:
- Create a compelling title (5-10 words) that captures the essence of the content
- Write a 2-3 sentence summary that highlights the main points and why they matter
- Focus on actionable insights and implications
- Use clear, accessible language while maintaining technical accuracy
- Avoid marketing fluff - focus on substance

IMPORTANT: Return your response as valid JSON with exactly this format:
{"title": "Your title here", "summary": "Your summary here"}"#;

pub struct GeminiSummarizer {
    client: Client,
    api_key: String,
}

impl GeminiSummarizer {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, api_key }
    }
}

#[async_trait]
impl Summarize for GeminiSummarizer {
    async fn summarize(
        &self,
        title: &str,
        content: &str,
        kind_label: &str,
    ) -> Result<DigestOutput> {
        // Truncate content if too long
        let content = if content.len() > 8000 {
            let mut end = 8000;
            while !content.is_char_boundary(end) {
                end -= 1;
            }
            &content[..end]
        } else {
            content
        };

        let prompt = format!(
            "{}\n\nCreate a digest for this {}:\nTitle: {}\nContent: {}\n\n\
             Return ONLY valid JSON with this exact format:\n\
             {{\"title\": \"Your compelling title\", \"summary\": \"Your 2-3 sentence summary\"}}",
            DIGEST_PROMPT, kind_label, title, content
        );

        let response = generate_text(&self.client, &self.api_key, prompt).await?;
        let output: DigestOutput =
            serde_json::from_str(strip_code_fences(&response)).map_err(|e| {
                AppError::SummarizerApi(format!("unparseable digest response: {}", e))
            })?;
        Ok(output)
    }
}
