pub mod args;

use crate::matcher::{KeyMatcher, MatchMode};
use crate::types::S3Credentials;

/// Main configuration for a s3sweep run.
///
/// Built once at startup (usually from [`CLIArgs`](crate::CLIArgs) via
/// `Config::try_from`) and only read afterwards.
///
/// # Quick Start
///
/// ```
/// use s3sweep_rs::{Config, MatchMode};
///
/// let mut config = Config::for_target("my-bucket", "us-east-1", "logs/");
/// config.match_mode = Some(MatchMode::Prefix);
/// config.dry_run = true;
/// assert_eq!(config.key_matcher().server_side_prefix(), Some("logs/"));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub bucket: String,
    pub client_config: ClientConfig,
    pub match_mode: Option<MatchMode>,
    pub pattern: String,
    pub dry_run: bool,
    /// Page size for ListObjectsV2. `None` leaves the S3 default (1000).
    pub max_keys: Option<i32>,
    pub tracing_config: Option<TracingConfig>,
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

impl Config {
    /// Create a `Config` with defaults matching the CLI: full-match mode,
    /// ambient credentials, no dry-run.
    pub fn for_target(bucket: &str, region: &str, pattern: &str) -> Self {
        Config {
            bucket: bucket.to_string(),
            client_config: ClientConfig {
                credential: S3Credentials::FromEnvironment,
                region: region.to_string(),
                endpoint_url: None,
                force_path_style: false,
            },
            match_mode: Some(MatchMode::Full),
            pattern: pattern.to_string(),
            dry_run: false,
            max_keys: None,
            tracing_config: None,
            auto_complete_shell: None,
        }
    }

    pub fn key_matcher(&self) -> KeyMatcher {
        KeyMatcher::new(self.match_mode, self.pattern.clone())
    }
}

/// AWS S3 client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credential: S3Credentials,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

/// Tracing (logging) configuration.
#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    pub tracing_level: log::Level,
    pub json_tracing: bool,
    pub aws_sdk_tracing: bool,
    pub disable_color_tracing: bool,
}
