mod loader;

pub use loader::{
    AnalysisMode, Config, ConfigError, ReportConfig, TelemetryConfig, DEFAULT_CONFIDENCE_THRESHOLD,
    DEFAULT_SITE, DEFAULT_TIME_RANGE,
};
