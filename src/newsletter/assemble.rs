use std::collections::{BTreeMap, HashSet};

use crate::models::{Digest, RawItem, SourceKind, TopicFlags};

/// A non-featured item rendered as a bare link.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub title: String,
    pub url: String,
}

/// One newsletter's worth of content: at most one featured digest per
/// source, plus capped link lists of everything else in the window.
#[derive(Debug, Clone, Default)]
pub struct NewsletterContent {
    pub featured: BTreeMap<SourceKind, Digest>,
    pub additional: BTreeMap<SourceKind, Vec<Link>>,
}

impl NewsletterContent {
    pub fn featured_count(&self) -> usize {
        self.featured.len()
    }

    pub fn additional_count(&self) -> usize {
        self.additional.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.featured.is_empty() && self.additional.is_empty()
    }
}

/// Assemble the shared newsletter from window-scoped digests and items.
///
/// `digests` arrive newest first; when `ranked_ids` is provided (curator
/// output, best first) the listed digests take precedence in that order
/// and unlisted ones keep their recency order behind them. The first
/// digest per source wins the featured slot. `items_by_kind` are the
/// window's items newest first; those already carrying a digest are
/// excluded from the link lists, which are capped per source.
pub fn assemble_content(
    digests: Vec<Digest>,
    items_by_kind: BTreeMap<SourceKind, Vec<RawItem>>,
    ranked_ids: Option<&[String]>,
    links_per_source: usize,
) -> NewsletterContent {
    let digest_ids: HashSet<String> = digests.iter().map(|d| d.id.clone()).collect();

    let ordered = match ranked_ids {
        Some(ids) => {
            let mut ordered: Vec<Digest> = Vec::with_capacity(digests.len());
            let mut remaining = digests;
            for id in ids {
                if let Some(pos) = remaining.iter().position(|d| &d.id == id) {
                    ordered.push(remaining.remove(pos));
                }
            }
            ordered.extend(remaining);
            ordered
        }
        None => digests,
    };

    let mut featured = BTreeMap::new();
    for digest in ordered {
        featured.entry(digest.source_kind).or_insert(digest);
    }

    let mut additional = BTreeMap::new();
    for (kind, items) in items_by_kind {
        let links: Vec<Link> = items
            .into_iter()
            .filter(|item| !digest_ids.contains(&item.digest_id()))
            .take(links_per_source)
            .map(|item| Link {
                title: item.title,
                url: item.url,
            })
            .collect();
        if !links.is_empty() {
            additional.insert(kind, links);
        }
    }

    NewsletterContent {
        featured,
        additional,
    }
}

/// A disabled topic contributes nothing, featured or links.
pub fn filter_for_subscriber(content: &NewsletterContent, topics: &TopicFlags) -> NewsletterContent {
    NewsletterContent {
        featured: content
            .featured
            .iter()
            .filter(|(kind, _)| topics.wants(**kind))
            .map(|(kind, digest)| (*kind, digest.clone()))
            .collect(),
        additional: content
            .additional
            .iter()
            .filter(|(kind, _)| topics.wants(**kind))
            .map(|(kind, links)| (*kind, links.clone()))
            .collect(),
    }
}
