use crate::config::{ClientConfig, Config, TracingConfig};
use crate::matcher::MatchMode;
use crate::types::error::S3SweepError;
use crate::types::{AccessKeys, S3Credentials};
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::ffi::OsString;
use url::Url;


// ---------------------------------------------------------------------------
// Default constants
// ---------------------------------------------------------------------------

const DEFAULT_IS_FULL_MATCH: bool = true;
const DEFAULT_IS_ANY_MATCH: bool = false;
const DEFAULT_IS_PREFIX_MATCH: bool = false;
const DEFAULT_IS_SUFFIX_MATCH: bool = false;
const DEFAULT_DRY_RUN: bool = false;
const DEFAULT_FORCE_PATH_STYLE: bool = false;
const DEFAULT_JSON_TRACING: bool = false;
const DEFAULT_AWS_SDK_TRACING: bool = false;
const DEFAULT_DISABLE_COLOR_TRACING: bool = false;

const MAX_KEYS_LIMIT: i32 = 1000;

// ---------------------------------------------------------------------------
// Error messages
// ---------------------------------------------------------------------------

const ERROR_MESSAGE_INVALID_BUCKET: &str = "Bucket name must not be empty or contain '/'.";
const ERROR_MESSAGE_EMPTY_PATTERN: &str = "Object key to delete must not be empty.";
const ERROR_MESSAGE_INVALID_BOOL: &str =
    "Value must be one of true/false, yes/no, on/off, 1/0 or empty.";
const ERROR_MESSAGE_INVALID_MAX_KEYS: &str =
    "Object search batch size must be an integer between 1 and 1000.";
const ERROR_MESSAGE_INVALID_SCHEME: &str = "URL scheme must be https:// or http://";

// ---------------------------------------------------------------------------
// Value parser helpers
// ---------------------------------------------------------------------------

/// An empty value (an unset action input) resolves to `default`.
fn parse_bool_input(s: &str, default: bool) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        _ => Err(ERROR_MESSAGE_INVALID_BOOL.to_string()),
    }
}

fn check_bool_default_true(s: &str) -> Result<bool, String> {
    parse_bool_input(s, true)
}

fn check_bool_default_false(s: &str) -> Result<bool, String> {
    parse_bool_input(s, false)
}

fn parse_max_keys(s: &str) -> Result<Option<i32>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }

    match s.parse::<i32>() {
        Ok(value) if (1..=MAX_KEYS_LIMIT).contains(&value) => Ok(Some(value)),
        _ => Err(ERROR_MESSAGE_INVALID_MAX_KEYS.to_string()),
    }
}

/// Clap value_parser that validates the page size without consuming it.
/// An empty value (an unset action input) is accepted and means "default".
fn check_max_keys(s: &str) -> Result<String, String> {
    parse_max_keys(s)?;
    Ok(s.to_string())
}

/// Clap value_parser for the endpoint URL. An empty value means "not set".
fn check_endpoint_url(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Ok(String::new());
    }

    let parsed = Url::parse(s).map_err(|e| e.to_string())?;
    if parsed.scheme() != "https" && parsed.scheme() != "http" {
        return Err(ERROR_MESSAGE_INVALID_SCHEME.to_string());
    }

    Ok(s.to_string())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// CLIArgs (clap-derived argument struct)
// ---------------------------------------------------------------------------

/// s3sweep - Delete Amazon S3 objects whose keys match a pattern.
///
/// Every option can also be set through the environment variable shown in
/// the help output. The names follow the GitHub Actions `INPUT_*`
/// convention, so the binary can run as an action step without arguments.
///
/// Example:
///   s3sweep --aws-bucket-name my-bucket --aws-bucket-region us-east-1 --object-key-to-delete logs/app.log
///   s3sweep --aws-bucket-name my-bucket --aws-bucket-region us-east-1 --is-prefix-match --object-key-to-delete tmp/ --dry-run
#[derive(Parser, Clone, Debug)]
#[command(name = "s3sweep", version, about, long_about = None)]
pub struct CLIArgs {
    // -----------------------------------------------------------------------
    // Target options
    // -----------------------------------------------------------------------
    /// Name of the bucket to scan.
    #[arg(
        long,
        env = "INPUT_AWS_BUCKET_NAME",
        value_parser = NonEmptyStringValueParser::new(),
        default_value_if("auto_complete_shell", clap::builder::ArgPredicate::IsPresent, "ignored"),
        help_heading = "Target"
    )]
    pub aws_bucket_name: String,

    /// Region of the bucket.
    #[arg(
        long,
        env = "INPUT_AWS_BUCKET_REGION",
        value_parser = NonEmptyStringValueParser::new(),
        default_value_if("auto_complete_shell", clap::builder::ArgPredicate::IsPresent, "ignored"),
        help_heading = "Target"
    )]
    pub aws_bucket_region: String,

    /// Key, or part of a key, of the objects to delete.
    #[arg(
        long,
        env = "INPUT_OBJECT_KEY_TO_DELETE",
        value_parser = NonEmptyStringValueParser::new(),
        default_value_if("auto_complete_shell", clap::builder::ArgPredicate::IsPresent, "ignored"),
        help_heading = "Target"
    )]
    pub object_key_to_delete: String,

    // -----------------------------------------------------------------------
    // Match options
    // -----------------------------------------------------------------------
    /// Delete objects whose key equals the pattern.
    #[arg(
        long,
        env = "INPUT_IS_FULL_MATCH",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = DEFAULT_IS_FULL_MATCH,
        default_missing_value = "true",
        value_parser = check_bool_default_true,
        help_heading = "Match"
    )]
    pub is_full_match: bool,

    /// Delete objects whose key contains the pattern.
    #[arg(
        long,
        env = "INPUT_IS_ANY_MATCH",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = DEFAULT_IS_ANY_MATCH,
        default_missing_value = "true",
        value_parser = check_bool_default_false,
        help_heading = "Match"
    )]
    pub is_any_match: bool,

    /// Delete objects whose key starts with the pattern.
    #[arg(
        long,
        env = "INPUT_IS_PREFIX_MATCH",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = DEFAULT_IS_PREFIX_MATCH,
        default_missing_value = "true",
        value_parser = check_bool_default_false,
        help_heading = "Match",
        long_help = r#"Delete objects whose key starts with the pattern.
The pattern is also sent to S3 as the listing prefix, so only
candidate objects are transferred."#
    )]
    pub is_prefix_match: bool,

    /// Delete objects whose key ends with the pattern.
    #[arg(
        long,
        env = "INPUT_IS_SUFFIX_MATCH",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = DEFAULT_IS_SUFFIX_MATCH,
        default_missing_value = "true",
        value_parser = check_bool_default_false,
        help_heading = "Match"
    )]
    pub is_suffix_match: bool,

    // -----------------------------------------------------------------------
    // General options
    // -----------------------------------------------------------------------
    /// Simulation mode. Lists and matches objects but does not delete them.
    #[arg(
        short = 'd',
        long,
        env = "INPUT_DRY_RUN",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = DEFAULT_DRY_RUN,
        default_missing_value = "true",
        value_parser = check_bool_default_false,
        help_heading = "General"
    )]
    pub dry_run: bool,

    /// Number of keys requested per listing page (1-1000).
    #[arg(
        long,
        env = "INPUT_AWS_BUCKET_OBJECT_SEARCH_BATCH_SIZE",
        value_parser = check_max_keys,
        help_heading = "General"
    )]
    pub aws_bucket_object_search_batch_size: Option<String>,

    // -----------------------------------------------------------------------
    // AWS configuration
    // -----------------------------------------------------------------------
    /// AWS access key ID. Used only together with the secret access key.
    #[arg(long, env = "INPUT_AWS_ACCESS_KEY_ID", hide_env_values = true, help_heading = "AWS")]
    pub aws_access_key_id: Option<String>,

    /// AWS secret access key. Used only together with the access key ID.
    #[arg(
        long,
        env = "INPUT_AWS_SECRET_ACCESS_KEY",
        hide_env_values = true,
        help_heading = "AWS"
    )]
    pub aws_secret_access_key: Option<String>,

    /// Custom S3-compatible endpoint URL (e.g. MinIO, LocalStack).
    #[arg(
        long,
        env = "INPUT_ENDPOINT_URL",
        value_parser = check_endpoint_url,
        help_heading = "AWS"
    )]
    pub endpoint_url: Option<String>,

    /// Force path-style access (required for some S3-compatible services).
    #[arg(
        long,
        env = "INPUT_FORCE_PATH_STYLE",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = DEFAULT_FORCE_PATH_STYLE,
        default_missing_value = "true",
        value_parser = check_bool_default_false,
        help_heading = "AWS"
    )]
    pub force_path_style: bool,

    // -----------------------------------------------------------------------
    // Logging options
    // -----------------------------------------------------------------------
    /// Verbosity level. -q (quiet), default (info), -v, -vv.
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Output logs in JSON format.
    #[arg(
        long,
        env = "INPUT_JSON_TRACING",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = DEFAULT_JSON_TRACING,
        default_missing_value = "true",
        value_parser = check_bool_default_false,
        help_heading = "Logging"
    )]
    pub json_tracing: bool,

    /// Enable AWS SDK tracing.
    #[arg(
        long,
        env = "INPUT_AWS_SDK_TRACING",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = DEFAULT_AWS_SDK_TRACING,
        default_missing_value = "true",
        value_parser = check_bool_default_false,
        help_heading = "Logging"
    )]
    pub aws_sdk_tracing: bool,

    /// Disable colored output in logs.
    #[arg(
        long,
        env = "INPUT_DISABLE_COLOR_TRACING",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = DEFAULT_DISABLE_COLOR_TRACING,
        default_missing_value = "true",
        value_parser = check_bool_default_false,
        help_heading = "Logging"
    )]
    pub disable_color_tracing: bool,

    // -----------------------------------------------------------------------
    // Advanced options
    // -----------------------------------------------------------------------
    /// Generate shell completions.
    #[arg(long, help_heading = "Advanced")]
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

// ---------------------------------------------------------------------------
// parse_from_args (public API)
// ---------------------------------------------------------------------------

/// Parse command-line arguments into a `CLIArgs` struct.
///
/// # Example
///
/// ```
/// use s3sweep_rs::config::args::parse_from_args;
///
/// let args = vec![
///     "s3sweep",
///     "--aws-bucket-name", "my-bucket",
///     "--aws-bucket-region", "us-east-1",
///     "--object-key-to-delete", "logs/app.log",
///     "--dry-run",
/// ];
/// let cli_args = parse_from_args(args).unwrap();
/// assert!(cli_args.dry_run);
/// ```
pub fn parse_from_args<I, T>(args: I) -> Result<CLIArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CLIArgs::try_parse_from(args)
}

/// Parse arguments and build a Config in one step.
pub fn build_config_from_args<I, T>(args: I) -> Result<Config, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli_args = CLIArgs::try_parse_from(args).map_err(|e| e.to_string())?;
    Config::try_from(cli_args).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Validation and Config conversion
// ---------------------------------------------------------------------------

impl CLIArgs {
    /// True when exactly one of the two static key fields was given.
    ///
    /// Such a pair is ignored and the default credential chain is used.
    pub fn has_partial_credentials(&self) -> bool {
        non_empty(&self.aws_access_key_id).is_some()
            != non_empty(&self.aws_secret_access_key).is_some()
    }

    fn validate(&self) -> Result<(), S3SweepError> {
        if self.aws_bucket_name.is_empty() || self.aws_bucket_name.contains('/') {
            return Err(S3SweepError::InvalidConfig(
                ERROR_MESSAGE_INVALID_BUCKET.to_string(),
            ));
        }
        if self.object_key_to_delete.is_empty() {
            return Err(S3SweepError::InvalidConfig(
                ERROR_MESSAGE_EMPTY_PATTERN.to_string(),
            ));
        }
        Ok(())
    }

    fn build_match_mode(&self) -> Option<MatchMode> {
        MatchMode::from_flags(
            self.is_full_match,
            self.is_any_match,
            self.is_prefix_match,
            self.is_suffix_match,
        )
    }

    fn build_max_keys(&self) -> Result<Option<i32>, S3SweepError> {
        match self.aws_bucket_object_search_batch_size.as_deref() {
            Some(value) => parse_max_keys(value).map_err(S3SweepError::InvalidConfig),
            None => Ok(None),
        }
    }

    fn build_client_config(&self) -> ClientConfig {
        let credential = match (
            non_empty(&self.aws_access_key_id),
            non_empty(&self.aws_secret_access_key),
        ) {
            (Some(access_key), Some(secret_access_key)) => S3Credentials::Credentials {
                access_keys: AccessKeys {
                    access_key: access_key.to_string(),
                    secret_access_key: secret_access_key.to_string(),
                },
            },
            _ => S3Credentials::FromEnvironment,
        };

        ClientConfig {
            credential,
            region: self.aws_bucket_region.clone(),
            endpoint_url: non_empty(&self.endpoint_url).map(str::to_string),
            force_path_style: self.force_path_style,
        }
    }

    fn build_tracing_config(&self) -> Option<TracingConfig> {
        let log_level = self.verbosity.log_level()?;

        Some(TracingConfig {
            tracing_level: log_level,
            json_tracing: self.json_tracing,
            aws_sdk_tracing: self.aws_sdk_tracing,
            disable_color_tracing: self.disable_color_tracing,
        })
    }
}

impl TryFrom<CLIArgs> for Config {
    type Error = S3SweepError;

    fn try_from(args: CLIArgs) -> Result<Self, Self::Error> {
        args.validate()?;

        Ok(Config {
            bucket: args.aws_bucket_name.clone(),
            client_config: args.build_client_config(),
            match_mode: args.build_match_mode(),
            pattern: args.object_key_to_delete.clone(),
            dry_run: args.dry_run,
            max_keys: args.build_max_keys()?,
            tracing_config: args.build_tracing_config(),
            auto_complete_shell: args.auto_complete_shell,
        })
    }
}
