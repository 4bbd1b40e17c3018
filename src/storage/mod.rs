use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::operation::delete_objects::DeleteObjectsOutput;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::types::ObjectIdentifier;

use crate::config::Config;

pub mod s3;

/// Type alias for a boxed Storage trait object.
pub type Storage = Box<dyn StorageTrait + Send + Sync>;

/// The two S3 calls a sweep needs, bound to a single bucket.
///
/// The lister and the deleter only talk to S3 through this trait, so tests
/// can script responses with a mock instead of a live bucket.
#[async_trait]
pub trait StorageTrait {
    fn bucket(&self) -> &str;

    /// Fetch one ListObjectsV2 page.
    ///
    /// `prefix` is sent as-is when present. `continuation_token` is `None`
    /// for the first page. `max_keys` of `None` leaves the service default.
    async fn list_objects_page(
        &self,
        prefix: Option<&str>,
        continuation_token: Option<String>,
        max_keys: Option<i32>,
    ) -> Result<ListObjectsV2Output>;

    /// Delete up to 1000 objects in one DeleteObjects request.
    ///
    /// The keys are full S3 keys. Per-key failures come back inside the
    /// output, only transport or request-level failures return `Err`.
    async fn delete_objects(&self, objects: Vec<ObjectIdentifier>) -> Result<DeleteObjectsOutput>;
}

/// Create the S3 storage for the configured bucket.
pub async fn create_storage(config: &Config) -> Storage {
    s3::S3Storage::boxed(config).await
}
