use serde::{Deserialize, Serialize};

use super::SourceKind;

/// Per-source opt-in flags for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicFlags {
    pub youtube: bool,
    pub openai: bool,
    pub anthropic: bool,
    pub f1: bool,
}

impl TopicFlags {
    pub fn wants(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Youtube => self.youtube,
            SourceKind::Openai => self.openai,
            SourceKind::Anthropic => self.anthropic,
            SourceKind::F1 => self.f1,
        }
    }
}

impl Default for TopicFlags {
    fn default() -> Self {
        Self {
            youtube: true,
            openai: true,
            anthropic: true,
            f1: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    pub email: String,
    pub preferred_name: String,
    pub topics: TopicFlags,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub email: String,
    pub preferred_name: String,
    pub topics: TopicFlags,
    pub active: bool,
}
