//! Shared test utilities for the s3sweep library crate.
//!
//! Provides the tracing initialiser, a default [`Config`] and a scripted
//! [`MockStorage`] used by the lister, deleter and pipeline tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_sdk_s3::operation::delete_objects::DeleteObjectsOutput;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::types::{DeletedObject, Object, ObjectIdentifier};

use crate::config::Config;
use crate::matcher::MatchMode;
use crate::storage::{Storage, StorageTrait};

/// Initialise a dummy tracing subscriber for tests.
///
/// Uses `try_init` so that only the first call in a process actually
/// installs the subscriber; subsequent calls are silently ignored.
pub(crate) fn init_dummy_tracing_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dummy=trace")
        .try_init();
}

/// Create a default [`Config`] for unit tests.
///
/// bucket=`"test-bucket"`, region=`"us-east-1"`, full match on `pattern`.
pub(crate) fn make_test_config(mode: MatchMode, pattern: &str) -> Config {
    let mut config = Config::for_target("test-bucket", "us-east-1", pattern);
    config.match_mode = Some(mode);
    config
}

pub(crate) fn make_object(key: &str) -> Object {
    Object::builder().key(key).size(1).build()
}

/// Build a ListObjectsV2 page. A `next_token` marks the page as truncated.
pub(crate) fn make_page(keys: &[&str], next_token: Option<&str>) -> ListObjectsV2Output {
    let mut builder = ListObjectsV2Output::builder().is_truncated(next_token.is_some());
    for key in keys {
        builder = builder.contents(make_object(key));
    }
    builder.set_next_continuation_token(next_token.map(str::to_string)).build()
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ListCall {
    pub prefix: Option<String>,
    pub continuation_token: Option<String>,
    pub max_keys: Option<i32>,
}

/// In-memory [`StorageTrait`] that replays scripted listing pages and
/// records every call.
///
/// Clones share state, so a test keeps one clone for assertions and hands
/// the other to the code under test.
#[derive(Clone, Default)]
pub(crate) struct MockStorage {
    pages: Arc<Mutex<VecDeque<ListObjectsV2Output>>>,
    list_calls: Arc<Mutex<Vec<ListCall>>>,
    delete_calls: Arc<Mutex<Vec<Vec<String>>>>,
    /// Keys reported back as per-key errors, mapped to the error code.
    error_keys: Arc<Mutex<HashMap<String, String>>>,
    /// Answer DeleteObjects without a `Deleted` list.
    omit_deleted: Arc<AtomicBool>,
    fail_list: Arc<AtomicBool>,
    /// DeleteObjects calls with an index at or above this value fail.
    fail_delete_from: Arc<Mutex<Option<usize>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(pages: Vec<ListObjectsV2Output>) -> Self {
        let mock = Self::new();
        mock.pages.lock().unwrap().extend(pages);
        mock
    }

    pub fn boxed(&self) -> Storage {
        Box::new(self.clone())
    }

    pub fn set_error_key(&self, key: &str, code: &str) {
        self.error_keys
            .lock()
            .unwrap()
            .insert(key.to_string(), code.to_string());
    }

    pub fn set_omit_deleted(&self) {
        self.omit_deleted.store(true, Ordering::SeqCst);
    }

    pub fn set_fail_list(&self) {
        self.fail_list.store(true, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self) {
        self.set_fail_delete_after(0);
    }

    /// Let the first `succeeding` DeleteObjects calls through, fail the rest.
    pub fn set_fail_delete_after(&self, succeeding: usize) {
        *self.fail_delete_from.lock().unwrap() = Some(succeeding);
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<Vec<String>> {
        self.delete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageTrait for MockStorage {
    fn bucket(&self) -> &str {
        "test-bucket"
    }

    async fn list_objects_page(
        &self,
        prefix: Option<&str>,
        continuation_token: Option<String>,
        max_keys: Option<i32>,
    ) -> Result<ListObjectsV2Output> {
        self.list_calls.lock().unwrap().push(ListCall {
            prefix: prefix.map(str::to_string),
            continuation_token,
            max_keys,
        });

        if self.fail_list.load(Ordering::SeqCst) {
            return Err(anyhow!("AccessDenied: list_objects_v2 rejected"));
        }

        Ok(self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ListObjectsV2Output::builder().is_truncated(false).build()))
    }

    async fn delete_objects(&self, objects: Vec<ObjectIdentifier>) -> Result<DeleteObjectsOutput> {
        let call_index = {
            let mut calls = self.delete_calls.lock().unwrap();
            calls.push(objects.iter().map(|o| o.key().to_string()).collect());
            calls.len() - 1
        };

        if self
            .fail_delete_from
            .lock()
            .unwrap()
            .is_some_and(|from| call_index >= from)
        {
            return Err(anyhow!("AccessDenied: delete_objects rejected"));
        }

        let error_keys = self.error_keys.lock().unwrap().clone();
        let mut builder = DeleteObjectsOutput::builder();

        for identifier in &objects {
            let key = identifier.key();
            if let Some(error_code) = error_keys.get(key) {
                builder = builder.errors(
                    aws_sdk_s3::types::Error::builder()
                        .key(key)
                        .code(error_code.as_str())
                        .message(format!("{error_code} error"))
                        .build(),
                );
            } else if !self.omit_deleted.load(Ordering::SeqCst) {
                builder = builder.deleted(DeletedObject::builder().key(key).build());
            }
        }

        Ok(builder.build())
    }
}
