mod article;
mod import;
mod mailer;
mod transcript;

pub use article::ArticleFetcher;
pub use import::{import_subscribers, ImportReport};
pub use mailer::EmailClient;
pub use transcript::TranscriptFetcher;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::RawItem;

/// Outcome of a derivation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Derived {
    Content(String),
    /// Recognized, permanent absence (captions disabled, no readable
    /// body). Stored as the sentinel; never retried.
    NotAvailable,
}

/// Derives the missing content field for one item: a transcript for a
/// video, a converted body for an article. Errors are transient and leave
/// the item eligible for the next run.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn derive(&self, item: &RawItem) -> Result<Derived>;
}

/// Outbound email collaborator. The delivery stage enforces inter-send
/// pacing; implementations just send.
#[async_trait]
pub trait SendEmail: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str, text: &str) -> Result<()>;
}
