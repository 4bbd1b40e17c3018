//! Deletion pipeline orchestrator.
//!
//! Connects the stages of a sweep and runs them once, in order:
//!
//! ```text
//! ObjectLister -> KeyMatcher -> DeletionAccumulator -> BatchDeleter
//! ```
//!
//! Listing must finish before anything is deleted, so a listing failure
//! leaves the bucket untouched.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::accumulator::DeletionAccumulator;
use crate::config::Config;
use crate::deleter::BatchDeleter;
use crate::lister::ObjectLister;
use crate::storage::{self, Storage};
use crate::types::DeletionResult;
use crate::types::error::S3SweepError;

/// ## Usage
///
/// ```no_run
/// # async fn example() -> anyhow::Result<()> {
/// use s3sweep_rs::{Config, DeletionPipeline, MatchMode};
///
/// let mut config = Config::for_target("my-bucket", "us-east-1", "tmp/");
/// config.match_mode = Some(MatchMode::Prefix);
///
/// let pipeline = DeletionPipeline::new(config).await;
/// let result = pipeline.run().await?;
/// println!("{:?}", result.deleted);
/// # Ok(())
/// # }
/// ```
pub struct DeletionPipeline {
    config: Config,
    target: Storage,
}

impl DeletionPipeline {
    /// Create a pipeline backed by the S3 bucket named in `config`.
    pub async fn new(config: Config) -> Self {
        let target = storage::create_storage(&config).await;
        Self::with_storage(config, target)
    }

    /// Create a pipeline on top of an existing storage.
    pub fn with_storage(config: Config, target: Storage) -> Self {
        Self { config, target }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the sweep and return the keys S3 confirmed as deleted.
    ///
    /// An empty pattern is rejected before the bucket is listed. Errors from
    /// listing or deleting are returned as-is; nothing after the failing step
    /// runs.
    pub async fn run(&self) -> Result<DeletionResult> {
        if self.config.pattern.is_empty() {
            return Err(S3SweepError::InvalidConfig(
                "Object key to delete must not be empty.".to_string(),
            )
            .into());
        }

        let matcher = self.config.key_matcher();

        if matcher.mode().is_none() {
            warn!("No match mode is enabled. No object will be deleted.");
        }

        debug!(
            bucket = self.config.bucket,
            pattern = matcher.pattern(),
            mode = ?matcher.mode(),
            dry_run = self.config.dry_run,
            "deletion pipeline has started."
        );

        let lister = ObjectLister::new(
            &self.target,
            matcher.server_side_prefix().map(str::to_string),
            self.config.max_keys,
        );
        let mut accumulator = DeletionAccumulator::new(&matcher, self.config.dry_run);

        let summary = lister
            .enumerate(|objects| accumulator.on_page(objects))
            .await
            .with_context(|| format!("Failed to list objects in bucket {}.", self.config.bucket))?;

        let matched = accumulator.matched_count();
        debug!(
            pages = summary.pages,
            objects = summary.objects,
            matched = matched,
            "object enumeration has been completed."
        );

        if self.config.dry_run && matched > 0 {
            info!("Dry-run: {matched} objects would be deleted.");
        }

        let result = BatchDeleter::new(&self.target)
            .flush(accumulator.into_batch())
            .await?;

        debug!(
            deleted = result.deleted.len(),
            failed = result.failed.len(),
            "deletion pipeline has been completed."
        );

        Ok(result)
    }
}
