//! Shared E2E test infrastructure for s3sweep-rs.
//!
//! Provides `TestHelper` for bucket management, object operations and
//! pipeline execution against real AWS S3. All helpers use the
//! `s3sweep-e2e-test` AWS profile.

#![allow(dead_code)]

use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier,
};
use s3sweep_rs::config::args::build_config_from_args;
use s3sweep_rs::{Config, DeletionPipeline, DeletionResult};
use uuid::Uuid;

/// AWS profile used for all E2E tests.
const AWS_PROFILE: &str = "s3sweep-e2e-test";

const DEFAULT_REGION: &str = "us-east-1";

/// Deletes all objects and the bucket.
///
/// Call `cleanup()` at the end of a test. If the test panics first, the
/// drop handler runs the same cleanup on a separate runtime.
pub struct BucketGuard {
    helper: Arc<TestHelper>,
    bucket: String,
    cleaned: bool,
}

impl BucketGuard {
    pub async fn cleanup(mut self) {
        self.helper.delete_bucket_cascade(&self.bucket).await;
        self.cleaned = true;
    }
}

impl Drop for BucketGuard {
    fn drop(&mut self) {
        if self.cleaned {
            return;
        }

        let helper = self.helper.clone();
        let bucket = self.bucket.clone();
        let _ = std::thread::spawn(move || {
            if let Ok(runtime) = tokio::runtime::Runtime::new() {
                runtime.block_on(async move { helper.delete_bucket_cascade(&bucket).await });
            }
        })
        .join();
    }
}

pub struct TestHelper {
    client: Client,
    region: String,
}

impl TestHelper {
    pub async fn new() -> Arc<Self> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(AWS_PROFILE)
            .load()
            .await;

        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let client = Client::new(&sdk_config);

        Arc::new(Self { client, region })
    }

    pub fn bucket_guard(self: &Arc<Self>, bucket: &str) -> BucketGuard {
        BucketGuard {
            helper: Arc::clone(self),
            bucket: bucket.to_string(),
            cleaned: false,
        }
    }

    /// Returns a name like `s3sweep-e2e-<uuid>`, unique across parallel runs.
    pub fn generate_bucket_name(&self) -> String {
        format!("s3sweep-e2e-{}", Uuid::new_v4())
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    // -----------------------------------------------------------------------
    // Bucket management
    // -----------------------------------------------------------------------

    pub async fn create_bucket(&self, bucket: &str) {
        let mut builder = self.client.create_bucket().bucket(bucket);

        // us-east-1 must NOT specify a location constraint
        if self.region != "us-east-1" {
            let constraint = BucketLocationConstraint::from(self.region.as_str());
            let config = CreateBucketConfiguration::builder()
                .location_constraint(constraint)
                .build();
            builder = builder.create_bucket_configuration(config);
        }

        builder
            .send()
            .await
            .unwrap_or_else(|e| panic!("Failed to create bucket {bucket}: {e}"));
    }

    pub async fn delete_bucket_cascade(&self, bucket: &str) {
        loop {
            let keys = match self.list_page(bucket).await {
                Some(keys) if !keys.is_empty() => keys,
                _ => break,
            };

            let objects: Vec<ObjectIdentifier> = keys
                .iter()
                .filter_map(|key| ObjectIdentifier::builder().key(key).build().ok())
                .collect();
            let Ok(delete) = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
            else {
                break;
            };

            if self
                .client
                .delete_objects()
                .bucket(bucket)
                .delete(delete)
                .send()
                .await
                .is_err()
            {
                break;
            }
        }

        let _ = self.client.delete_bucket().bucket(bucket).send().await;
    }

    async fn list_page(&self, bucket: &str) -> Option<Vec<String>> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .ok()?;

        Some(
            resp.contents()
                .iter()
                .filter_map(|o| o.key().map(str::to_string))
                .collect(),
        )
    }

    // -----------------------------------------------------------------------
    // Object operations
    // -----------------------------------------------------------------------

    pub async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body.into())
            .send()
            .await
            .unwrap_or_else(|e| panic!("Failed to put object {key} in {bucket}: {e}"));
    }

    /// Upload `(key, body)` pairs concurrently.
    pub async fn put_objects_parallel(&self, bucket: &str, objects: Vec<(String, Vec<u8>)>) {
        let mut set = tokio::task::JoinSet::new();

        for (key, body) in objects {
            let client = self.client.clone();
            let bucket = bucket.to_string();
            set.spawn(async move {
                client
                    .put_object()
                    .bucket(&bucket)
                    .key(&key)
                    .body(body.into())
                    .send()
                    .await
                    .unwrap_or_else(|e| panic!("Failed to put object {key} in {bucket}: {e}"));
            });
        }

        while let Some(result) = set.join_next().await {
            result.expect("Upload task panicked");
        }
    }

    /// List remaining object keys under the given prefix.
    pub async fn list_objects(&self, bucket: &str, prefix: &str) -> Vec<String> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .unwrap_or_else(|e| panic!("Failed to list objects in {bucket}/{prefix}: {e}"));

            keys.extend(
                resp.contents()
                    .iter()
                    .filter_map(|obj| obj.key().map(str::to_string)),
            );

            if resp.is_truncated() == Some(true) {
                continuation_token = resp.next_continuation_token().map(|s| s.to_string());
            } else {
                break;
            }
        }

        keys
    }

    // -----------------------------------------------------------------------
    // Pipeline execution
    // -----------------------------------------------------------------------

    /// Build a `Config` for `bucket` in this helper's region.
    ///
    /// `extra` is appended after the bucket, region and pattern arguments.
    pub fn build_config(&self, bucket: &str, pattern: &str, extra: &[&str]) -> Config {
        let mut args = vec![
            "s3sweep",
            "--aws-bucket-name",
            bucket,
            "--aws-bucket-region",
            self.region(),
            "--object-key-to-delete",
            pattern,
        ];
        args.extend_from_slice(extra);

        let mut config = build_config_from_args(args).expect("Failed to build config");
        config.tracing_config = None;
        config
    }

    pub async fn run_pipeline(&self, config: Config) -> DeletionResult {
        // The profile is only visible to the helper's client, so the pipeline
        // gets the same credentials through the environment chain.
        // This code is used to test purpose only.
        unsafe { std::env::set_var("AWS_PROFILE", AWS_PROFILE) };

        DeletionPipeline::new(config)
            .await
            .run()
            .await
            .expect("Pipeline failed")
    }
}

/// Default timeout for E2E tests (5 minutes).
pub const E2E_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(300);

/// Wraps an async E2E test body with a timeout.
#[macro_export]
macro_rules! e2e_timeout {
    ($body:expr) => {
        tokio::time::timeout(common::E2E_TIMEOUT, $body)
            .await
            .expect("E2E test timed out")
    };
}
