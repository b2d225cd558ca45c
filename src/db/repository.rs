use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{params, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{Digest, NewDigest, NewItem, NewSubscriber, RawItem, SourceKind, Subscriber, TopicFlags, CONTENT_UNAVAILABLE};

use super::schema::SCHEMA;

/// Row counts surfaced by the health endpoint.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoreStats {
    pub items: i64,
    pub digests: i64,
    pub subscribers: i64,
}

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Item operations

    /// Insert candidates, silently skipping keys already present in the
    /// source partition. Returns the number of rows actually inserted.
    /// One prepared statement over the whole batch; semantics identical to
    /// one-at-a-time inserts.
    pub async fn bulk_insert_items(&self, items: Vec<NewItem>) -> Result<usize> {
        let ingested_at = fmt_ts(Utc::now());
        let inserted = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"INSERT OR IGNORE INTO items
                       (source_kind, natural_key, title, url, description, published_at, ingested_at)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                )?;
                let mut inserted = 0usize;
                for item in items {
                    inserted += stmt.execute(params![
                        item.source_kind.as_str(),
                        item.natural_key,
                        item.title,
                        item.url,
                        item.description,
                        fmt_ts(item.published_at),
                        ingested_at,
                    ])?;
                }
                Ok(inserted)
            })
            .await?;
        Ok(inserted)
    }

    /// Items of a kind whose derived content has never been attempted.
    /// Sentinel-marked and already-filled items are excluded by the NULL
    /// check, so they are never re-queried.
    pub async fn items_missing_content(&self, kind: SourceKind) -> Result<Vec<RawItem>> {
        let items = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT source_kind, natural_key, title, url, description,
                              derived_content, published_at, ingested_at
                       FROM items
                       WHERE source_kind = ?1 AND derived_content IS NULL
                       ORDER BY published_at DESC"#,
                )?;
                let items = stmt
                    .query_map(params![kind.as_str()], |row| Ok(item_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(items)
            })
            .await?;
        Ok(items)
    }

    pub async fn set_derived_content(
        &self,
        kind: SourceKind,
        natural_key: String,
        content: String,
    ) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    "UPDATE items SET derived_content = ?1 WHERE source_kind = ?2 AND natural_key = ?3",
                    params![content, kind.as_str(), natural_key],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Items of a kind published within the last `hours`, newest first.
    pub async fn items_since(&self, kind: SourceKind, hours: u32) -> Result<Vec<RawItem>> {
        let cutoff = fmt_ts(Utc::now() - Duration::hours(hours as i64));
        let items = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT source_kind, natural_key, title, url, description,
                              derived_content, published_at, ingested_at
                       FROM items
                       WHERE source_kind = ?1 AND published_at >= ?2
                       ORDER BY published_at DESC"#,
                )?;
                let items = stmt
                    .query_map(params![kind.as_str(), cutoff], |row| Ok(item_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(items)
            })
            .await?;
        Ok(items)
    }

    /// Digest candidates: items of a kind in the window with no digest yet,
    /// enrichment-complete where the kind requires derived content, newest
    /// first, capped at `limit`.
    pub async fn items_without_digest(
        &self,
        kind: SourceKind,
        hours: u32,
        limit: u32,
    ) -> Result<Vec<RawItem>> {
        let cutoff = fmt_ts(Utc::now() - Duration::hours(hours as i64));
        let requires_content = kind.requires_derived_content();
        let items = self
            .conn
            .call(move |conn| {
                let content_clause = if requires_content {
                    "AND i.derived_content IS NOT NULL AND i.derived_content != ?4"
                } else {
                    "AND ?4 = ?4"
                };
                let sql = format!(
                    r#"SELECT i.source_kind, i.natural_key, i.title, i.url, i.description,
                              i.derived_content, i.published_at, i.ingested_at
                       FROM items i
                       LEFT JOIN digests d
                         ON d.source_kind = i.source_kind AND d.source_item_key = i.natural_key
                       WHERE i.source_kind = ?1 AND i.published_at >= ?2 AND d.id IS NULL
                       {content_clause}
                       ORDER BY i.published_at DESC
                       LIMIT ?3"#
                );
                let mut stmt = conn.prepare(&sql)?;
                let items = stmt
                    .query_map(
                        params![kind.as_str(), cutoff, limit, CONTENT_UNAVAILABLE],
                        |row| Ok(item_from_row(row)),
                    )?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(items)
            })
            .await?;
        Ok(items)
    }

    // Digest operations

    /// Insert a digest keyed on its deterministic id. Returns false when a
    /// digest with that id already exists (replay or concurrent run) — a
    /// no-op, not an error.
    pub async fn insert_digest(&self, digest: NewDigest) -> Result<bool> {
        let inserted = self
            .conn
            .call(move |conn| {
                let n = conn.execute(
                    r#"INSERT OR IGNORE INTO digests
                       (id, source_kind, source_item_key, url, title, summary, created_at)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                    params![
                        digest.id(),
                        digest.source_kind.as_str(),
                        digest.source_item_key,
                        digest.url,
                        digest.title,
                        digest.summary,
                        fmt_ts(digest.created_at),
                    ],
                )?;
                Ok(n > 0)
            })
            .await?;
        Ok(inserted)
    }

    /// Digests created within the last `hours`, newest first.
    pub async fn digests_since(&self, hours: u32) -> Result<Vec<Digest>> {
        let cutoff = fmt_ts(Utc::now() - Duration::hours(hours as i64));
        let digests = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, source_kind, source_item_key, url, title, summary, created_at
                       FROM digests
                       WHERE created_at >= ?1
                       ORDER BY created_at DESC"#,
                )?;
                let digests = stmt
                    .query_map(params![cutoff], |row| Ok(digest_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(digests)
            })
            .await?;
        Ok(digests)
    }

    // Retention

    /// Delete items ingested more than `hours` ago, regardless of digest
    /// status. Returns the number of rows removed.
    pub async fn delete_items_older_than(&self, hours: u32) -> Result<usize> {
        let cutoff = fmt_ts(Utc::now() - Duration::hours(hours as i64));
        let deleted = self
            .conn
            .call(move |conn| {
                let n = conn.execute("DELETE FROM items WHERE ingested_at < ?1", params![cutoff])?;
                Ok(n)
            })
            .await?;
        Ok(deleted)
    }

    pub async fn delete_digests_older_than(&self, hours: u32) -> Result<usize> {
        let cutoff = fmt_ts(Utc::now() - Duration::hours(hours as i64));
        let deleted = self
            .conn
            .call(move |conn| {
                let n = conn.execute("DELETE FROM digests WHERE created_at < ?1", params![cutoff])?;
                Ok(n)
            })
            .await?;
        Ok(deleted)
    }

    // Subscriber operations

    pub async fn upsert_subscriber(&self, sub: NewSubscriber) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO subscribers (email, preferred_name, youtube, openai, anthropic, f1, active)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                       ON CONFLICT(email) DO UPDATE SET
                           preferred_name = excluded.preferred_name,
                           youtube = excluded.youtube,
                           openai = excluded.openai,
                           anthropic = excluded.anthropic,
                           f1 = excluded.f1,
                           active = excluded.active,
                           updated_at = datetime('now')"#,
                    params![
                        sub.email,
                        sub.preferred_name,
                        sub.topics.youtube,
                        sub.topics.openai,
                        sub.topics.anthropic,
                        sub.topics.f1,
                        sub.active,
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn active_subscribers(&self) -> Result<Vec<Subscriber>> {
        let subs = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT email, preferred_name, youtube, openai, anthropic, f1, active
                       FROM subscribers
                       WHERE active = 1
                       ORDER BY email"#,
                )?;
                let subs = stmt
                    .query_map([], |row| Ok(subscriber_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(subs)
            })
            .await?;
        Ok(subs)
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        let stats = self
            .conn
            .call(|conn| {
                let items: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |r| r.get(0))?;
                let digests: i64 =
                    conn.query_row("SELECT COUNT(*) FROM digests", [], |r| r.get(0))?;
                let subscribers: i64 =
                    conn.query_row("SELECT COUNT(*) FROM subscribers", [], |r| r.get(0))?;
                Ok(StoreStats {
                    items,
                    digests,
                    subscribers,
                })
            })
            .await?;
        Ok(stats)
    }

    /// Test hook: insert a single item with an explicit ingestion time.
    #[cfg(test)]
    pub(crate) async fn insert_item_ingested_at(
        &self,
        item: NewItem,
        ingested_at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT OR IGNORE INTO items
                       (source_kind, natural_key, title, url, description, published_at, ingested_at)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                    params![
                        item.source_kind.as_str(),
                        item.natural_key,
                        item.title,
                        item.url,
                        item.description,
                        fmt_ts(item.published_at),
                        fmt_ts(ingested_at),
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

/// Uniform timestamp encoding so TEXT comparison matches time order.
fn fmt_ts(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn item_from_row(row: &Row) -> RawItem {
    RawItem {
        source_kind: row
            .get::<_, String>(0)
            .unwrap()
            .parse()
            .unwrap_or(SourceKind::F1),
        natural_key: row.get(1).unwrap(),
        title: row.get(2).unwrap(),
        url: row.get(3).unwrap(),
        description: row.get(4).unwrap(),
        derived_content: row.get(5).unwrap(),
        published_at: row
            .get::<_, String>(6)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
        ingested_at: row
            .get::<_, String>(7)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    }
}

fn digest_from_row(row: &Row) -> Digest {
    Digest {
        id: row.get(0).unwrap(),
        source_kind: row
            .get::<_, String>(1)
            .unwrap()
            .parse()
            .unwrap_or(SourceKind::F1),
        source_item_key: row.get(2).unwrap(),
        url: row.get(3).unwrap(),
        title: row.get(4).unwrap(),
        summary: row.get(5).unwrap(),
        created_at: row
            .get::<_, String>(6)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    }
}

fn subscriber_from_row(row: &Row) -> Subscriber {
    Subscriber {
        email: row.get(0).unwrap(),
        preferred_name: row.get(1).unwrap(),
        topics: TopicFlags {
            youtube: row.get::<_, i64>(2).unwrap() != 0,
            openai: row.get::<_, i64>(3).unwrap() != 0,
            anthropic: row.get::<_, i64>(4).unwrap() != 0,
            f1: row.get::<_, i64>(5).unwrap() != 0,
        },
        active: row.get::<_, i64>(6).unwrap() != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_repo() -> (Repository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let repo = Repository::new(path.to_str().unwrap()).await.unwrap();
        (repo, dir)
    }

    fn item(kind: SourceKind, key: &str, hours_ago: i64) -> NewItem {
        NewItem {
            source_kind: kind,
            natural_key: key.to_string(),
            title: format!("Item {key}"),
            url: format!("https://example.com/{key}"),
            description: Some("a description".to_string()),
            published_at: Utc::now() - Duration::hours(hours_ago),
        }
    }

    fn digest_for(kind: SourceKind, key: &str, hours_ago: i64) -> NewDigest {
        NewDigest {
            source_kind: kind,
            source_item_key: key.to_string(),
            url: format!("https://example.com/{key}"),
            title: format!("Digest {key}"),
            summary: "summary text".to_string(),
            created_at: Utc::now() - Duration::hours(hours_ago),
        }
    }

    #[tokio::test]
    async fn bulk_insert_is_idempotent() {
        let (repo, _dir) = open_repo().await;
        let batch = vec![
            item(SourceKind::Openai, "a", 1),
            item(SourceKind::Openai, "b", 2),
        ];
        let first = repo.bulk_insert_items(batch.clone()).await.unwrap();
        assert_eq!(first, 2);

        // Replaying an overlapping window must not duplicate or error.
        let second = repo.bulk_insert_items(batch).await.unwrap();
        assert_eq!(second, 0);
        assert_eq!(repo.stats().await.unwrap().items, 2);
    }

    #[tokio::test]
    async fn same_key_different_sources_both_stored() {
        let (repo, _dir) = open_repo().await;
        repo.bulk_insert_items(vec![
            item(SourceKind::Openai, "shared", 1),
            item(SourceKind::Anthropic, "shared", 1),
        ])
        .await
        .unwrap();
        assert_eq!(repo.stats().await.unwrap().items, 2);
    }

    #[tokio::test]
    async fn digest_insert_is_a_noop_on_existing_id() {
        let (repo, _dir) = open_repo().await;
        assert!(repo
            .insert_digest(digest_for(SourceKind::Youtube, "v1", 0))
            .await
            .unwrap());
        assert!(!repo
            .insert_digest(digest_for(SourceKind::Youtube, "v1", 0))
            .await
            .unwrap());
        assert_eq!(repo.stats().await.unwrap().digests, 1);
    }

    #[tokio::test]
    async fn sentinel_items_are_never_requeried() {
        let (repo, _dir) = open_repo().await;
        repo.bulk_insert_items(vec![
            item(SourceKind::Youtube, "v1", 1),
            item(SourceKind::Youtube, "v2", 2),
        ])
        .await
        .unwrap();

        repo.set_derived_content(
            SourceKind::Youtube,
            "v1".to_string(),
            CONTENT_UNAVAILABLE.to_string(),
        )
        .await
        .unwrap();

        let pending = repo.items_missing_content(SourceKind::Youtube).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].natural_key, "v2");
    }

    #[tokio::test]
    async fn digest_candidates_capped_newest_first() {
        let (repo, _dir) = open_repo().await;
        repo.bulk_insert_items(vec![
            item(SourceKind::Openai, "old", 10),
            item(SourceKind::Openai, "newer", 2),
            item(SourceKind::Openai, "newest", 1),
        ])
        .await
        .unwrap();

        let picked = repo
            .items_without_digest(SourceKind::Openai, 24, 1)
            .await
            .unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].natural_key, "newest");

        let two = repo
            .items_without_digest(SourceKind::Openai, 24, 2)
            .await
            .unwrap();
        assert_eq!(
            two.iter().map(|i| i.natural_key.as_str()).collect::<Vec<_>>(),
            vec!["newest", "newer"]
        );
    }

    #[tokio::test]
    async fn digest_candidates_respect_content_requirement() {
        let (repo, _dir) = open_repo().await;
        repo.bulk_insert_items(vec![
            item(SourceKind::Youtube, "with", 1),
            item(SourceKind::Youtube, "without", 2),
            item(SourceKind::Youtube, "unavailable", 3),
        ])
        .await
        .unwrap();
        repo.set_derived_content(SourceKind::Youtube, "with".to_string(), "transcript".to_string())
            .await
            .unwrap();
        repo.set_derived_content(
            SourceKind::Youtube,
            "unavailable".to_string(),
            CONTENT_UNAVAILABLE.to_string(),
        )
        .await
        .unwrap();

        let picked = repo
            .items_without_digest(SourceKind::Youtube, 24, 10)
            .await
            .unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].natural_key, "with");
    }

    #[tokio::test]
    async fn digested_items_are_excluded_from_candidates() {
        let (repo, _dir) = open_repo().await;
        repo.bulk_insert_items(vec![item(SourceKind::F1, "race", 1)])
            .await
            .unwrap();
        repo.insert_digest(digest_for(SourceKind::F1, "race", 1))
            .await
            .unwrap();

        let picked = repo.items_without_digest(SourceKind::F1, 24, 10).await.unwrap();
        assert!(picked.is_empty());
    }

    #[tokio::test]
    async fn retention_is_keyed_on_ingested_at() {
        let (repo, _dir) = open_repo().await;
        repo.insert_item_ingested_at(
            item(SourceKind::Openai, "stale", 1),
            Utc::now() - Duration::hours(200),
        )
        .await
        .unwrap();
        repo.insert_item_ingested_at(item(SourceKind::Openai, "fresh", 1), Utc::now())
            .await
            .unwrap();
        // Digest status is irrelevant to retention.
        repo.insert_digest(digest_for(SourceKind::Openai, "stale", 200))
            .await
            .unwrap();

        let removed = repo.delete_items_older_than(168).await.unwrap();
        assert_eq!(removed, 1);
        let remaining = repo.items_since(SourceKind::Openai, 1000).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].natural_key, "fresh");

        let purged = repo.delete_digests_older_than(168).await.unwrap();
        assert_eq!(purged, 1);
    }

    #[tokio::test]
    async fn subscriber_upsert_dedups_case_insensitively() {
        let (repo, _dir) = open_repo().await;
        let sub = NewSubscriber {
            email: "Alice@Example.com".to_string(),
            preferred_name: "Alice".to_string(),
            topics: TopicFlags::default(),
            active: true,
        };
        repo.upsert_subscriber(sub.clone()).await.unwrap();
        repo.upsert_subscriber(NewSubscriber {
            email: "alice@example.com".to_string(),
            preferred_name: "Alice B".to_string(),
            ..sub
        })
        .await
        .unwrap();

        let subs = repo.active_subscribers().await.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].preferred_name, "Alice B");
    }

    #[tokio::test]
    async fn inactive_subscribers_are_not_listed() {
        let (repo, _dir) = open_repo().await;
        repo.upsert_subscriber(NewSubscriber {
            email: "gone@example.com".to_string(),
            preferred_name: "Gone".to_string(),
            topics: TopicFlags::default(),
            active: false,
        })
        .await
        .unwrap();
        assert!(repo.active_subscribers().await.unwrap().is_empty());
    }
}
