use std::time::Duration;

// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "spanmetrics";

/// Log target prefix of this crate
pub const LOG_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".spanmetrics";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "spanmetrics.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "SPANMETRICS_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "SPANMETRICS_LOG";

// =============================================================================
// Span Metrics Connector Defaults
// =============================================================================

/// Registered component name
pub const SPANMETRICS_COMPONENT_NAME: &str = "otelcol.connector.spanmetrics";

/// Default number of dimension sets kept in the engine's cache
pub const DEFAULT_DIMENSIONS_CACHE_SIZE: i64 = 1000;

/// Default interval between metric flushes
pub const DEFAULT_METRICS_FLUSH_INTERVAL: Duration = Duration::from_secs(15);

/// Default histogram unit
pub const DEFAULT_HISTOGRAM_UNIT: &str = "ms";

/// Default bucket count limit of exponential histograms
pub const DEFAULT_EXPONENTIAL_MAX_SIZE: i32 = 160;

/// Default explicit histogram bucket bounds
pub const DEFAULT_EXPLICIT_BUCKETS: [Duration; 16] = [
    Duration::from_millis(2),
    Duration::from_millis(4),
    Duration::from_millis(6),
    Duration::from_millis(8),
    Duration::from_millis(10),
    Duration::from_millis(50),
    Duration::from_millis(100),
    Duration::from_millis(200),
    Duration::from_millis(400),
    Duration::from_millis(800),
    Duration::from_secs(1),
    Duration::from_millis(1400),
    Duration::from_secs(2),
    Duration::from_secs(5),
    Duration::from_secs(10),
    Duration::from_secs(15),
];
