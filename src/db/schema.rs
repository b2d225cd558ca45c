pub const SCHEMA: &str = r#"
-- items table: one row per (source_kind, natural_key)
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_kind TEXT NOT NULL,
    natural_key TEXT NOT NULL,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT,
    derived_content TEXT,
    published_at TEXT NOT NULL,
    ingested_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(source_kind, natural_key)
);

CREATE INDEX IF NOT EXISTS idx_items_published_at ON items(source_kind, published_at DESC);
CREATE INDEX IF NOT EXISTS idx_items_ingested_at ON items(ingested_at);

-- digests table: id is {source_kind}:{natural_key}, so at most one per item
CREATE TABLE IF NOT EXISTS digests (
    id TEXT PRIMARY KEY,
    source_kind TEXT NOT NULL,
    source_item_key TEXT NOT NULL,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    summary TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_digests_created_at ON digests(created_at DESC);

-- subscribers table: upserted by the import, read at delivery
CREATE TABLE IF NOT EXISTS subscribers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    preferred_name TEXT NOT NULL DEFAULT 'there',
    youtube INTEGER NOT NULL DEFAULT 1,
    openai INTEGER NOT NULL DEFAULT 1,
    anthropic INTEGER NOT NULL DEFAULT 1,
    f1 INTEGER NOT NULL DEFAULT 1,
    active INTEGER NOT NULL DEFAULT 1,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
