mod report;

pub use report::{
    DeliveryReport, DigestReport, EnrichReport, ImportStageReport, IngestReport, RunSummary,
    SourceIngest, SweepReport,
};

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};

use crate::ai::{GeminiCurator, GeminiSummarizer, RankDigests, Summarize};
use crate::config::Config;
use crate::db::Repository;
use crate::error::Result;
use crate::models::{NewDigest, SourceKind, CONTENT_UNAVAILABLE};
use crate::newsletter::{self, NewsletterContent};
use crate::services::{
    import_subscribers, ArticleFetcher, EmailClient, Enricher, SendEmail, TranscriptFetcher,
};
use crate::sources::{
    validate, BlogFeedAdapter, MotorsportFeedAdapter, SourceAdapter, YouTubeAdapter,
};

/// How many source feeds fetch concurrently during ingestion.
const FETCH_CONCURRENCY: usize = 4;

/// One run of the content pipeline: sweep, subscriber import, ingest,
/// enrich, digest, curate, deliver. Stages run in that order and a stage
/// failure never prevents later stages from running.
pub struct Pipeline {
    config: Config,
    repo: Arc<Repository>,
    adapters: Vec<Arc<dyn SourceAdapter>>,
    enrichers: Vec<(SourceKind, Arc<dyn Enricher>)>,
    summarizer: Option<Arc<dyn Summarize>>,
    curator: Option<Arc<dyn RankDigests>>,
    mailer: Option<Arc<dyn SendEmail>>,
}

impl Pipeline {
    /// Wire up the real collaborators. Missing API keys leave the matching
    /// collaborator unset; the affected stage reports a stage-fatal error
    /// at run time instead of failing construction.
    pub async fn from_config(config: Config) -> Result<Self> {
        let repo = Arc::new(Repository::new(&config.db_path).await?);

        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(YouTubeAdapter::new(config.youtube_channels.clone())),
            Arc::new(BlogFeedAdapter::new(
                SourceKind::Openai,
                config.openai_feed_url.clone(),
            )),
            Arc::new(BlogFeedAdapter::new(
                SourceKind::Anthropic,
                config.anthropic_feed_url.clone(),
            )),
            Arc::new(MotorsportFeedAdapter::new(config.f1_feed_url.clone())),
        ];

        let enrichers: Vec<(SourceKind, Arc<dyn Enricher>)> = vec![
            (SourceKind::Youtube, Arc::new(TranscriptFetcher::new())),
            (SourceKind::Anthropic, Arc::new(ArticleFetcher::new())),
        ];

        let summarizer: Option<Arc<dyn Summarize>> = config
            .gemini_api_key
            .clone()
            .map(|key| Arc::new(GeminiSummarizer::new(key)) as Arc<dyn Summarize>);
        let curator: Option<Arc<dyn RankDigests>> = config
            .gemini_api_key
            .clone()
            .map(|key| Arc::new(GeminiCurator::new(key)) as Arc<dyn RankDigests>);
        let mailer: Option<Arc<dyn SendEmail>> = config
            .email_api_key
            .clone()
            .map(|key| Arc::new(EmailClient::new(key, config.email_from.clone())) as Arc<dyn SendEmail>);

        if summarizer.is_none() {
            tracing::warn!("No Gemini API key configured; digest stage will be skipped");
        }
        if mailer.is_none() {
            tracing::warn!("No email API key configured; delivery stage will be skipped");
        }

        Ok(Self {
            config,
            repo,
            adapters,
            enrichers,
            summarizer,
            curator,
            mailer,
        })
    }

    #[cfg(test)]
    fn with_collaborators(
        config: Config,
        repo: Arc<Repository>,
        adapters: Vec<Arc<dyn SourceAdapter>>,
        enrichers: Vec<(SourceKind, Arc<dyn Enricher>)>,
        summarizer: Option<Arc<dyn Summarize>>,
        curator: Option<Arc<dyn RankDigests>>,
        mailer: Option<Arc<dyn SendEmail>>,
    ) -> Self {
        Self {
            config,
            repo,
            adapters,
            enrichers,
            summarizer,
            curator,
            mailer,
        }
    }

    pub fn repository(&self) -> Arc<Repository> {
        Arc::clone(&self.repo)
    }

    pub async fn run(&self) -> RunSummary {
        let started_at = Utc::now();
        tracing::info!("Pipeline run starting");

        let sweep = self.sweep().await;
        let import = self.import().await;
        let ingest = self.ingest().await;
        let enrich = self.enrich().await;
        let digest = self.digest().await;
        let delivery = self.deliver().await;

        let mut summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            sweep,
            import,
            ingest,
            enrich,
            digest,
            delivery,
            success: false,
        };
        summary.compute_success();

        match serde_json::to_string(&summary) {
            Ok(json) => tracing::info!(success = summary.success, summary = %json, "Pipeline run finished"),
            Err(_) => tracing::info!(success = summary.success, "Pipeline run finished"),
        }
        summary
    }

    async fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();
        let hours = self.config.retention_hours;
        match self.repo.delete_items_older_than(hours).await {
            Ok(n) => report.items_deleted = n,
            Err(e) => {
                tracing::warn!("Retention sweep (items) failed: {}", e);
                report.error = Some(e.to_string());
                return report;
            }
        }
        match self.repo.delete_digests_older_than(hours).await {
            Ok(n) => report.digests_deleted = n,
            Err(e) => {
                tracing::warn!("Retention sweep (digests) failed: {}", e);
                report.error = Some(e.to_string());
            }
        }
        if report.items_deleted > 0 || report.digests_deleted > 0 {
            tracing::info!(
                items = report.items_deleted,
                digests = report.digests_deleted,
                "Purged records past retention"
            );
        }
        report
    }

    async fn import(&self) -> ImportStageReport {
        let mut report = ImportStageReport::default();
        let Some(url) = self.config.subscribers_csv_url.as_deref() else {
            return report;
        };
        match import_subscribers(&self.repo, url).await {
            Ok(r) => report.report = Some(r),
            Err(e) => {
                // Import trouble must not block the content stages.
                tracing::warn!("Subscriber import failed: {}", e);
                report.error = Some(e.to_string());
            }
        }
        report
    }

    async fn ingest(&self) -> IngestReport {
        let window = self.config.scrape_hours;
        let fetches = stream::iter(self.adapters.iter().cloned())
            .map(|adapter| async move {
                let kind = adapter.kind();
                (kind, adapter.fetch(window).await)
            })
            .buffer_unordered(FETCH_CONCURRENCY)
            // Type-erasing the stream works around rustc #102211
            // ("implementation of `FnOnce` is not general enough") when
            // the handler future is checked for `Send` by axum.
            .boxed()
            .collect::<Vec<_>>()
            .await;

        let mut report = IngestReport::default();
        for (kind, outcome) in fetches {
            let mut source = SourceIngest::default();
            match outcome {
                Ok(candidates) => {
                    source.fetched = candidates.len();
                    let valid = validate(candidates);
                    match self.repo.bulk_insert_items(valid).await {
                        Ok(inserted) => {
                            source.inserted = inserted;
                            tracing::info!(
                                source = %kind,
                                fetched = source.fetched,
                                inserted,
                                "Ingested source"
                            );
                        }
                        Err(e) => {
                            tracing::warn!(source = %kind, "Persist failed: {}", e);
                            source.error = Some(e.to_string());
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(source = %kind, "Fetch failed: {}", e);
                    source.error = Some(e.to_string());
                }
            }
            report.sources.insert(kind.to_string(), source);
        }
        report
    }

    async fn enrich(&self) -> EnrichReport {
        let mut report = EnrichReport::default();
        for (kind, enricher) in &self.enrichers {
            let items = match self.repo.items_missing_content(*kind).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(source = %kind, "Loading enrichment backlog failed: {}", e);
                    report.failed += 1;
                    continue;
                }
            };
            for item in items {
                match enricher.derive(&item).await {
                    Ok(crate::services::Derived::Content(content)) => {
                        match self
                            .repo
                            .set_derived_content(*kind, item.natural_key.clone(), content)
                            .await
                        {
                            Ok(()) => report.derived += 1,
                            Err(e) => {
                                tracing::warn!(key = %item.natural_key, "Storing content failed: {}", e);
                                report.failed += 1;
                            }
                        }
                    }
                    Ok(crate::services::Derived::NotAvailable) => {
                        match self
                            .repo
                            .set_derived_content(
                                *kind,
                                item.natural_key.clone(),
                                CONTENT_UNAVAILABLE.to_string(),
                            )
                            .await
                        {
                            Ok(()) => report.unavailable += 1,
                            Err(e) => {
                                tracing::warn!(key = %item.natural_key, "Storing sentinel failed: {}", e);
                                report.failed += 1;
                            }
                        }
                    }
                    // Transient; the item stays NULL and retries next run.
                    Err(e) => {
                        tracing::debug!(key = %item.natural_key, "Derivation failed: {}", e);
                        report.failed += 1;
                    }
                }
            }
        }
        report
    }

    async fn digest(&self) -> DigestReport {
        let mut report = DigestReport::default();
        let Some(summarizer) = &self.summarizer else {
            report.error = Some("no summarizer configured".to_string());
            return report;
        };

        for kind in SourceKind::ALL {
            let items = match self
                .repo
                .items_without_digest(kind, self.config.newsletter_hours, self.config.top_per_source)
                .await
            {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(source = %kind, "Loading digest candidates failed: {}", e);
                    report.failed += 1;
                    continue;
                }
            };
            for item in items {
                let content = item.summarizable_content();
                if content.trim().is_empty() {
                    tracing::debug!(id = %item.digest_id(), "No content to summarize, skipping");
                    continue;
                }
                let output = match summarizer
                    .summarize(&item.title, content, kind.display_name())
                    .await
                {
                    Ok(output) => output,
                    Err(e) => {
                        tracing::warn!(id = %item.digest_id(), "Summarization failed: {}", e);
                        report.failed += 1;
                        continue;
                    }
                };
                let digest = NewDigest {
                    source_kind: kind,
                    source_item_key: item.natural_key.clone(),
                    url: item.url.clone(),
                    title: output.title,
                    summary: output.summary,
                    created_at: item.published_at,
                };
                match self.repo.insert_digest(digest).await {
                    Ok(true) => report.created += 1,
                    Ok(false) => {
                        tracing::debug!(id = %item.digest_id(), "Digest already present")
                    }
                    Err(e) => {
                        tracing::warn!(id = %item.digest_id(), "Storing digest failed: {}", e);
                        report.failed += 1;
                    }
                }
            }
        }
        tracing::info!(created = report.created, failed = report.failed, "Digest stage done");
        report
    }

    /// Curation feeds straight into delivery; both live here because the
    /// assembled content never outlives the send loop.
    async fn deliver(&self) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let Some(mailer) = &self.mailer else {
            report.error = Some("no email client configured".to_string());
            return report;
        };

        let content = match self.curate().await {
            Ok(content) => content,
            Err(e) => {
                report.error = Some(e.to_string());
                return report;
            }
        };
        if content.featured.is_empty() {
            tracing::info!("No featured digests in window, nothing to send");
            report.note = Some("nothing to send".to_string());
            return report;
        }

        let subscribers = match self.repo.active_subscribers().await {
            Ok(subs) => subs,
            Err(e) => {
                report.error = Some(e.to_string());
                return report;
            }
        };
        if subscribers.is_empty() {
            report.note = Some("no active subscribers".to_string());
            return report;
        }

        let subject = newsletter::subject_line();
        tracing::info!(
            recipients = subscribers.len(),
            featured = content.featured_count(),
            links = content.additional_count(),
            "Sending newsletter"
        );

        for (i, sub) in subscribers.iter().enumerate() {
            // Strictly sequential, paced to stay under send rate limits.
            if i > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.send_delay_ms)).await;
            }
            let filtered = newsletter::filter_for_subscriber(&content, &sub.topics);
            if filtered.is_empty() {
                tracing::info!(email = %sub.email, "No content for selected topics, skipping");
                report.skipped += 1;
                continue;
            }
            let html = newsletter::render_html(&filtered, &sub.preferred_name);
            let text = newsletter::render_text(&filtered, &sub.preferred_name);
            match mailer.send(&sub.email, &subject, &html, &text).await {
                Ok(()) => {
                    tracing::info!(email = %sub.email, "Sent newsletter");
                    report.sent += 1;
                }
                Err(e) => {
                    tracing::warn!(email = %sub.email, "Send failed: {}", e);
                    report.failed.push(sub.email.clone());
                }
            }
        }
        // Every attempted send failing points at the collaborator itself
        // (bad credentials, endpoint down), not at individual recipients.
        if report.sent == 0 && !report.failed.is_empty() {
            report.error = Some("all sends failed".to_string());
        }
        report
    }

    async fn curate(&self) -> Result<NewsletterContent> {
        let window = self.config.newsletter_hours;
        let digests = self.repo.digests_since(window).await?;

        let mut items_by_kind = BTreeMap::new();
        for kind in SourceKind::ALL {
            let items = self.repo.items_since(kind, window).await?;
            if !items.is_empty() {
                items_by_kind.insert(kind, items);
            }
        }

        // Ranking is advisory: any failure falls back to recency order.
        let ranked = match &self.curator {
            Some(curator) if !digests.is_empty() => match curator.rank(&digests).await {
                Ok(ids) => Some(ids),
                Err(e) => {
                    tracing::warn!("Ranking failed, falling back to recency: {}", e);
                    None
                }
            },
            _ => None,
        };

        Ok(newsletter::assemble_content(
            digests,
            items_by_kind,
            ranked.as_deref(),
            self.config.additional_links_per_source as usize,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use tokio::time::Instant;

    use crate::ai::DigestOutput;
    use crate::error::AppError;
    use crate::models::{NewItem, NewSubscriber, TopicFlags};
    use crate::services::Derived;

    use super::*;

    struct StaticAdapter {
        kind: SourceKind,
        items: Vec<NewItem>,
    }

    #[async_trait]
    impl SourceAdapter for StaticAdapter {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn fetch(&self, _window_hours: u32) -> Result<Vec<NewItem>> {
            Ok(self.items.clone())
        }
    }

    struct FailingAdapter {
        kind: SourceKind,
    }

    #[async_trait]
    impl SourceAdapter for FailingAdapter {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn fetch(&self, _window_hours: u32) -> Result<Vec<NewItem>> {
            Err(AppError::Config("feed unreachable".to_string()))
        }
    }

    struct StaticEnricher(Derived);

    #[async_trait]
    impl Enricher for StaticEnricher {
        async fn derive(&self, _item: &crate::models::RawItem) -> Result<Derived> {
            Ok(self.0.clone())
        }
    }

    struct EchoSummarizer;

    #[async_trait]
    impl Summarize for EchoSummarizer {
        async fn summarize(
            &self,
            title: &str,
            _content: &str,
            _kind_label: &str,
        ) -> Result<DigestOutput> {
            Ok(DigestOutput {
                title: format!("Digest: {title}"),
                summary: "A concise summary.".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sends: Mutex<Vec<(String, Instant)>>,
    }

    #[async_trait]
    impl SendEmail for RecordingMailer {
        async fn send(&self, to: &str, _subject: &str, _html: &str, _text: &str) -> Result<()> {
            self.sends
                .lock()
                .unwrap()
                .push((to.to_string(), Instant::now()));
            Ok(())
        }
    }

    fn test_config(db_path: &str) -> Config {
        let mut config = Config::default();
        config.db_path = db_path.to_string();
        config.send_delay_ms = 600;
        config
    }

    async fn test_repo() -> (tempfile::TempDir, Arc<Repository>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let repo = Repository::new(path.to_str().unwrap()).await.unwrap();
        (dir, Arc::new(repo))
    }

    fn candidate(kind: SourceKind, key: &str, age_mins: i64) -> NewItem {
        NewItem {
            source_kind: kind,
            natural_key: key.to_string(),
            title: format!("title {key}"),
            url: format!("https://example.com/{key}"),
            description: Some(format!("description for {key}")),
            published_at: Utc::now() - ChronoDuration::minutes(age_mins),
        }
    }

    fn subscriber(email: &str, topics: TopicFlags, active: bool) -> NewSubscriber {
        NewSubscriber {
            email: email.to_string(),
            preferred_name: "Sub".to_string(),
            topics,
            active,
        }
    }

    #[tokio::test]
    async fn failing_source_does_not_block_others() {
        let (_dir, repo) = test_repo().await;
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(StaticAdapter {
                kind: SourceKind::Openai,
                items: vec![candidate(SourceKind::Openai, "a", 10)],
            }),
            Arc::new(FailingAdapter {
                kind: SourceKind::Youtube,
            }),
            Arc::new(StaticAdapter {
                kind: SourceKind::F1,
                items: vec![candidate(SourceKind::F1, "b", 20)],
            }),
        ];
        let pipeline = Pipeline::with_collaborators(
            test_config(":memory:"),
            repo,
            adapters,
            Vec::new(),
            None,
            None,
            None,
        );

        let report = pipeline.ingest().await;
        assert_eq!(report.total_inserted(), 2);
        assert_eq!(report.failed_sources(), 1);
        assert!(report.sources["youtube"].error.is_some());
        assert!(report.sources["openai"].error.is_none());
    }

    #[tokio::test]
    async fn digest_stage_requires_summarizer() {
        let (_dir, repo) = test_repo().await;
        let pipeline = Pipeline::with_collaborators(
            test_config(":memory:"),
            repo,
            Vec::new(),
            Vec::new(),
            None,
            None,
            None,
        );
        let report = pipeline.digest().await;
        assert!(report.error.is_some());
        assert_eq!(report.created, 0);
    }

    #[tokio::test]
    async fn enrichment_writes_sentinel_for_unavailable_content() {
        let (_dir, repo) = test_repo().await;
        repo.bulk_insert_items(vec![candidate(SourceKind::Youtube, "vid", 10)])
            .await
            .unwrap();

        let enrichers: Vec<(SourceKind, Arc<dyn Enricher>)> = vec![(
            SourceKind::Youtube,
            Arc::new(StaticEnricher(Derived::NotAvailable)),
        )];
        let pipeline = Pipeline::with_collaborators(
            test_config(":memory:"),
            repo.clone(),
            Vec::new(),
            enrichers,
            None,
            None,
            None,
        );

        let report = pipeline.enrich().await;
        assert_eq!(report.unavailable, 1);
        // Sentinel is terminal: nothing left in the backlog.
        let backlog = repo.items_missing_content(SourceKind::Youtube).await.unwrap();
        assert!(backlog.is_empty());
    }

    #[tokio::test]
    async fn delivery_skips_when_no_featured_digests() {
        let (_dir, repo) = test_repo().await;
        // Items exist but no digests, so there is nothing to feature.
        repo.bulk_insert_items(vec![candidate(SourceKind::F1, "race", 10)])
            .await
            .unwrap();
        repo.upsert_subscriber(subscriber("a@example.com", TopicFlags::default(), true))
            .await
            .unwrap();

        let mailer = Arc::new(RecordingMailer::default());
        let pipeline = Pipeline::with_collaborators(
            test_config(":memory:"),
            repo,
            Vec::new(),
            Vec::new(),
            None,
            None,
            Some(mailer.clone()),
        );

        let report = pipeline.deliver().await;
        assert_eq!(report.note.as_deref(), Some("nothing to send"));
        assert!(mailer.sends.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn end_to_end_run_digests_and_delivers_with_pacing() {
        let (_dir, repo) = test_repo().await;
        repo.upsert_subscriber(subscriber("a@example.com", TopicFlags::default(), true))
            .await
            .unwrap();
        repo.upsert_subscriber(subscriber("b@example.com", TopicFlags::default(), true))
            .await
            .unwrap();
        repo.upsert_subscriber(subscriber("off@example.com", TopicFlags::default(), false))
            .await
            .unwrap();

        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![Arc::new(StaticAdapter {
            kind: SourceKind::Openai,
            items: vec![
                candidate(SourceKind::Openai, "newer", 5),
                candidate(SourceKind::Openai, "older", 60),
            ],
        })];
        let mailer = Arc::new(RecordingMailer::default());
        let pipeline = Pipeline::with_collaborators(
            test_config(":memory:"),
            repo.clone(),
            adapters,
            Vec::new(),
            Some(Arc::new(EchoSummarizer)),
            None,
            Some(mailer.clone()),
        );

        let summary = pipeline.run().await;
        assert!(summary.success);
        assert_eq!(summary.ingest.total_inserted(), 2);
        // top_per_source = 1: only the newest item gets a digest.
        assert_eq!(summary.digest.created, 1);
        let digests = repo.digests_since(24).await.unwrap();
        assert_eq!(digests.len(), 1);
        assert_eq!(digests[0].source_item_key, "newer");
        assert_eq!(digests[0].title, "Digest: title newer");

        // Two active subscribers, inactive one excluded.
        assert_eq!(summary.delivery.sent, 2);
        let sends = mailer.sends.lock().unwrap();
        assert_eq!(sends.len(), 2);
        assert!(sends[1].1 - sends[0].1 >= Duration::from_millis(600));
    }

    struct BrokenMailer;

    #[async_trait]
    impl SendEmail for BrokenMailer {
        async fn send(&self, _to: &str, _subject: &str, _html: &str, _text: &str) -> Result<()> {
            Err(AppError::EmailApi("invalid API key".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn all_sends_failing_is_stage_fatal() {
        let (_dir, repo) = test_repo().await;
        repo.insert_digest(crate::models::NewDigest {
            source_kind: SourceKind::Openai,
            source_item_key: "post".to_string(),
            url: "https://example.com/post".to_string(),
            title: "Title".to_string(),
            summary: "Summary".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
        repo.upsert_subscriber(subscriber("a@example.com", TopicFlags::default(), true))
            .await
            .unwrap();
        repo.upsert_subscriber(subscriber("b@example.com", TopicFlags::default(), true))
            .await
            .unwrap();

        let pipeline = Pipeline::with_collaborators(
            test_config(":memory:"),
            repo,
            Vec::new(),
            Vec::new(),
            None,
            None,
            Some(Arc::new(BrokenMailer)),
        );

        let report = pipeline.deliver().await;
        assert_eq!(report.sent, 0);
        assert_eq!(report.failed.len(), 2);
        assert!(report.error.is_some());
    }

    #[tokio::test]
    async fn subscriber_with_disjoint_topics_is_skipped() {
        let (_dir, repo) = test_repo().await;
        let only_f1 = TopicFlags {
            youtube: false,
            openai: false,
            anthropic: false,
            f1: true,
        };
        repo.upsert_subscriber(subscriber("f1only@example.com", only_f1, true))
            .await
            .unwrap();

        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![Arc::new(StaticAdapter {
            kind: SourceKind::Openai,
            items: vec![candidate(SourceKind::Openai, "post", 5)],
        })];
        let mailer = Arc::new(RecordingMailer::default());
        let pipeline = Pipeline::with_collaborators(
            test_config(":memory:"),
            repo,
            adapters,
            Vec::new(),
            Some(Arc::new(EchoSummarizer)),
            None,
            Some(mailer.clone()),
        );

        let summary = pipeline.run().await;
        assert_eq!(summary.digest.created, 1);
        assert_eq!(summary.delivery.sent, 0);
        assert_eq!(summary.delivery.skipped, 1);
        assert!(mailer.sends.lock().unwrap().is_empty());
    }
}
