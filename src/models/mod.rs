mod digest;
mod item;
mod subscriber;

pub use digest::{Digest, NewDigest};
pub use item::{NewItem, RawItem, SourceKind, CONTENT_UNAVAILABLE};
pub use subscriber::{NewSubscriber, Subscriber, TopicFlags};
