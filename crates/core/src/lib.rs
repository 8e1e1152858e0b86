pub mod config;
pub mod metrics;
pub mod orchestrator;
pub mod ranking;
pub mod resolver;
pub mod searcher;
pub mod store;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, Config, ConfigError, DhtConfig, SearchConfig, TaskConfig,
};
pub use orchestrator::{SearchOutcome, SearchStatus, SearchTaskManager};
pub use ranking::SearchPriorities;
pub use resolver::{build_magnet, is_valid_info_hash, MagnetResolver, Resolver};
pub use searcher::{
    DhtDisabled, DhtLookup, DhtLookupSession, RawCandidate, ScoredCandidate, SearchError,
    TrackerHttpClient, TrackerSearch,
};
pub use store::{
    DefaultPreferences, MemoryLinkStore, PreferenceStore, ResolvedLinkStore, StoreError,
};
