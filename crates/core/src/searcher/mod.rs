//! Magnet candidate search backends.
//!
//! Two sources feed the resolver: the HTTP tracker aggregator (primary,
//! fallible) and the DHT lookup (best-effort fallback, infallible by
//! contract). Both normalize into [`RawCandidate`].

mod dht;
mod tracker;
mod types;

pub use dht::{DhtDisabled, DhtLookupSession};
pub use tracker::TrackerHttpClient;
pub use types::*;
