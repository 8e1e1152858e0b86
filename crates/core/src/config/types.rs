use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub dht: DhtConfig,
    #[serde(default)]
    pub tasks: TaskConfig,
}

/// Tracker aggregator search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Search endpoint template with one `{query}` placeholder.
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Announce URLs embedded into reconstructed magnet links, in order.
    #[serde(default = "default_trackers")]
    pub trackers: Vec<String>,
    /// HTTP request timeout in seconds (default: 15)
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            trackers: default_trackers(),
            timeout_secs: default_search_timeout(),
        }
    }
}

fn default_search_url() -> String {
    "https://apibay.org/q.php?q={query}".to_string()
}

fn default_trackers() -> Vec<String> {
    [
        "udp://tracker.opentrackr.org:1337/announce",
        "udp://tracker.coppersurfer.tk:6969/announce",
        "udp://tracker.leechers-paradise.org:6969/announce",
        "udp://9.rarbg.to:2710/announce",
        "udp://9.rarbg.me:2710/announce",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_search_timeout() -> u64 {
    15
}

/// DHT fallback configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DhtConfig {
    /// Enable the DHT fallback lookup (default: false)
    #[serde(default)]
    pub fallback_enabled: bool,
    /// Lookup deadline in seconds (default: 60)
    #[serde(default = "default_dht_timeout")]
    pub timeout_secs: u64,
}

impl Default for DhtConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: false,
            timeout_secs: default_dht_timeout(),
        }
    }
}

fn default_dht_timeout() -> u64 {
    60
}

/// Background search task configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskConfig {
    /// Worker pool size for concurrent resolutions (default: 3)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_searches: usize,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            max_concurrent_searches: default_max_concurrent(),
        }
    }
}

fn default_max_concurrent() -> usize {
    3
}
