use aws_sdk_s3::types::Object;
use tracing::info;

use crate::matcher::KeyMatcher;
use crate::types::DeletionBatch;

/// Collects the keys selected by a [`KeyMatcher`] while the bucket is listed.
///
/// In dry-run mode matched keys are only reported and the batch stays empty.
pub struct DeletionAccumulator<'a> {
    matcher: &'a KeyMatcher,
    dry_run: bool,
    batch: DeletionBatch,
    matched: usize,
}

impl<'a> DeletionAccumulator<'a> {
    pub fn new(matcher: &'a KeyMatcher, dry_run: bool) -> Self {
        Self {
            matcher,
            dry_run,
            batch: DeletionBatch::new(),
            matched: 0,
        }
    }

    pub fn on_page(&mut self, objects: &[Object]) {
        for object in objects {
            if let Some(key) = object.key() {
                if self.matcher.matches(Some(key)) {
                    self.on_item(key);
                }
            }
        }
    }

    pub fn on_item(&mut self, key: &str) {
        self.matched += 1;

        if self.dry_run {
            info!(key = key, "Would delete object: {key}");
            return;
        }

        self.batch.push(key);
    }

    /// Number of keys that matched, including those only reported in dry-run.
    pub fn matched_count(&self) -> usize {
        self.matched
    }

    pub fn into_batch(self) -> DeletionBatch {
        self.batch
    }
}
