//! Batch deletion using the S3 DeleteObjects API.
//!
//! The whole [`DeletionBatch`] is flushed once listing has finished. Batches
//! larger than the S3 limit are split into sequential requests of up to
//! [`MAX_BATCH_SIZE`] keys.

use anyhow::{Context, Result};
use aws_sdk_s3::types::ObjectIdentifier;
use tracing::{debug, info, warn};

use crate::storage::Storage;
use crate::types::{DeletionBatch, DeletionResult, FailedKey};


/// Maximum objects per batch DeleteObjects API call (S3 limit).
pub const MAX_BATCH_SIZE: usize = 1000;

pub struct BatchDeleter<'a> {
    target: &'a Storage,
}

impl<'a> BatchDeleter<'a> {
    pub fn new(target: &'a Storage) -> Self {
        Self { target }
    }

    /// Delete every key in `batch` and report what S3 confirmed.
    ///
    /// An empty batch makes no request. Per-key errors inside a response are
    /// logged and collected in [`DeletionResult::failed`]; a failed request
    /// aborts the flush.
    pub async fn flush(&self, batch: DeletionBatch) -> Result<DeletionResult> {
        let mut result = DeletionResult::default();

        if batch.is_empty() {
            info!("No object to delete");
            return Ok(result);
        }

        let identifiers = batch.into_identifiers();
        let chunk_count = identifiers.len().div_ceil(MAX_BATCH_SIZE);

        for (index, chunk) in identifiers.chunks(MAX_BATCH_SIZE).enumerate() {
            let chunk: Vec<ObjectIdentifier> = chunk.to_vec();
            let batch_count = chunk.len();

            debug!(
                batch_size = batch_count,
                chunk = index + 1,
                chunks = chunk_count,
                "sending DeleteObjects batch request."
            );

            let response = match self.target.delete_objects(chunk).await {
                Ok(response) => response,
                Err(e) => {
                    if !result.deleted.is_empty() {
                        log_deleted_keys(&result.deleted);
                    }
                    return Err(e).with_context(|| {
                        format!(
                            "DeleteObjects failed for batch {}/{} in bucket {} ({} objects already deleted).",
                            index + 1,
                            chunk_count,
                            self.target.bucket(),
                            result.deleted.len()
                        )
                    });
                }
            };

            result.deleted.extend(
                response
                    .deleted()
                    .iter()
                    .filter_map(|deleted| deleted.key().map(str::to_string)),
            );

            for err in response.errors() {
                let key = err.key().unwrap_or("unknown").to_string();
                let code = err.code().unwrap_or("unknown").to_string();
                let message = err.message().unwrap_or("no message").to_string();

                warn!(
                    key = key,
                    code = code,
                    message = message,
                    "S3 DeleteObjects partial failure for key '{}': {} ({}).",
                    key,
                    code,
                    message,
                );

                result.failed.push(FailedKey {
                    key,
                    error_code: code,
                    error_message: message,
                });
            }
        }

        if result.deleted.is_empty() {
            debug!(
                failed = result.failed.len(),
                "DeleteObjects returned no deleted objects."
            );
            return Ok(result);
        }

        log_deleted_keys(&result.deleted);

        Ok(result)
    }
}

fn log_deleted_keys(deleted: &[String]) {
    info!(
        "Successfully deleted {} objects from S3 bucket. Deleted objects:",
        deleted.len()
    );
    for key in deleted {
        info!(" • {key}");
    }
}
