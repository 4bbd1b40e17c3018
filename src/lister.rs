use anyhow::Result;
use aws_sdk_s3::types::Object;
use tracing::{debug, trace};

use crate::storage::Storage;
use crate::types::error::S3SweepError;

/// Pages through every object of the bucket with ListObjectsV2.
///
/// Requests are strictly sequential. Each non-empty page is handed to the
/// caller's callback before the next request is issued, so the callback
/// sees objects in listing order.
///
/// ```text
/// ObjectLister -> DeletionAccumulator -> BatchDeleter
/// ```
pub struct ObjectLister<'a> {
    storage: &'a Storage,
    prefix: Option<String>,
    max_keys: Option<i32>,
}

/// Counters for a finished enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingSummary {
    pub pages: usize,
    pub objects: usize,
}

impl<'a> ObjectLister<'a> {
    pub fn new(storage: &'a Storage, prefix: Option<String>, max_keys: Option<i32>) -> Self {
        Self {
            storage,
            prefix,
            max_keys,
        }
    }

    /// Enumerate the bucket, calling `on_page` once per non-empty page.
    ///
    /// Stops after a page that is not truncated, or as soon as a page comes
    /// back with no objects. A truncated page without a continuation token
    /// is reported as [`S3SweepError::MissingContinuationToken`].
    pub async fn enumerate<F>(&self, mut on_page: F) -> Result<ListingSummary>
    where
        F: FnMut(&[Object]),
    {
        debug!(
            bucket = self.storage.bucket(),
            prefix = self.prefix.as_deref(),
            max_keys = self.max_keys,
            "list target objects has started."
        );

        let mut summary = ListingSummary::default();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = self
                .storage
                .list_objects_page(
                    self.prefix.as_deref(),
                    continuation_token.take(),
                    self.max_keys,
                )
                .await?;

            let contents = output.contents();
            if contents.is_empty() {
                trace!(pages = summary.pages, "empty page, listing finished.");
                break;
            }

            summary.pages += 1;
            summary.objects += contents.len();
            on_page(contents);

            if output.is_truncated() != Some(true) {
                break;
            }

            match output.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => return Err(S3SweepError::MissingContinuationToken.into()),
            }
        }

        debug!(
            pages = summary.pages,
            objects = summary.objects,
            "list target objects has been completed."
        );

        Ok(summary)
    }
}
