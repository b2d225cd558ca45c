use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    pub gemini_api_key: Option<String>,
    pub email_api_key: Option<String>,
    pub subscribers_csv_url: Option<String>,
    pub cron_secret: Option<String>,

    #[serde(default = "default_email_from")]
    pub email_from: String,

    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Lookback window for ingestion, in hours.
    #[serde(default = "default_scrape_hours")]
    pub scrape_hours: u32,

    /// Eligibility window for digesting and newsletter assembly, in hours.
    #[serde(default = "default_newsletter_hours")]
    pub newsletter_hours: u32,

    /// Records older than this are purged at the start of each run.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u32,

    /// New digests per source per run. Bounds summarization API spend.
    #[serde(default = "default_top_per_source")]
    pub top_per_source: u32,

    #[serde(default = "default_additional_links_per_source")]
    pub additional_links_per_source: u32,

    /// Minimum delay between consecutive newsletter sends. The outbound
    /// email API allows 2 requests/second; 600ms keeps us under it.
    #[serde(default = "default_send_delay_ms")]
    pub send_delay_ms: u64,

    #[serde(default = "default_youtube_channels")]
    pub youtube_channels: Vec<String>,

    #[serde(default = "default_openai_feed_url")]
    pub openai_feed_url: String,

    #[serde(default = "default_anthropic_feed_url")]
    pub anthropic_feed_url: String,

    #[serde(default = "default_f1_feed_url")]
    pub f1_feed_url: String,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("news-digest");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("news.db").to_string_lossy().to_string()
}

fn default_email_from() -> String {
    "AI News Digest <digest@news.example.com>".to_string()
}

fn default_listen_port() -> u16 {
    8080
}

fn default_scrape_hours() -> u32 {
    24
}

fn default_newsletter_hours() -> u32 {
    24
}

fn default_retention_hours() -> u32 {
    168
}

fn default_top_per_source() -> u32 {
    1
}

fn default_additional_links_per_source() -> u32 {
    5
}

fn default_send_delay_ms() -> u64 {
    600
}

fn default_youtube_channels() -> Vec<String> {
    vec![
        "UCbfYPyITQ-7l4upoX8nvctg".to_string(), // Two Minute Papers
        "UCSHZKyawb77ixDdsGog4iWA".to_string(), // Lex Fridman
    ]
}

fn default_openai_feed_url() -> String {
    "https://openai.com/news/rss.xml".to_string()
}

fn default_anthropic_feed_url() -> String {
    "https://www.anthropic.com/news/rss.xml".to_string()
}

fn default_f1_feed_url() -> String {
    "https://www.formula1.com/en/latest/all.xml".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            gemini_api_key: None,
            email_api_key: None,
            subscribers_csv_url: None,
            cron_secret: None,
            email_from: default_email_from(),
            listen_port: default_listen_port(),
            scrape_hours: default_scrape_hours(),
            newsletter_hours: default_newsletter_hours(),
            retention_hours: default_retention_hours(),
            top_per_source: default_top_per_source(),
            additional_links_per_source: default_additional_links_per_source(),
            send_delay_ms: default_send_delay_ms(),
            youtube_channels: default_youtube_channels(),
            openai_feed_url: default_openai_feed_url(),
            anthropic_feed_url: default_anthropic_feed_url(),
            f1_feed_url: default_f1_feed_url(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("news-digest")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: Config = toml::from_str("gemini_api_key = \"k\"").unwrap();
        assert_eq!(config.scrape_hours, 24);
        assert_eq!(config.retention_hours, 168);
        assert_eq!(config.top_per_source, 1);
        assert_eq!(config.additional_links_per_source, 5);
        assert_eq!(config.send_delay_ms, 600);
        assert_eq!(config.gemini_api_key.as_deref(), Some("k"));
        assert!(config.email_api_key.is_none());
    }
}
