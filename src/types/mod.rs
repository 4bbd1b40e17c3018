use std::fmt;
use std::fmt::{Debug, Formatter};

use aws_sdk_s3::types::ObjectIdentifier;
use serde::Serialize;
use zeroize_derive::{Zeroize, ZeroizeOnDrop};

pub mod error;

/// AWS credential sources supported by s3sweep.
///
/// `Credentials` is only chosen when both the access key and the secret key
/// were provided; anything else resolves through the default provider chain
/// (environment variables, shared profile, container or instance role).
#[derive(Debug, Clone)]
pub enum S3Credentials {
    Credentials { access_keys: AccessKeys },
    FromEnvironment,
}

/// Static AWS access key pair.
///
/// The secret access key is cleared from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccessKeys {
    pub access_key: String,
    pub secret_access_key: String,
}

impl Debug for AccessKeys {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut keys = f.debug_struct("AccessKeys");
        keys.field("access_key", &self.access_key)
            .field("secret_access_key", &"** redacted **");
        keys.finish()
    }
}

/// Keys selected for deletion during a single run, in encounter order.
///
/// The batch only grows while pages are scanned and is handed by value to
/// [`BatchDeleter::flush`](crate::deleter::BatchDeleter::flush), so it can
/// be consumed exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeletionBatch {
    objects: Vec<ObjectIdentifier>,
}

impl DeletionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key. Duplicates are kept.
    pub fn push(&mut self, key: &str) {
        // ObjectIdentifier::build() only fails when `key` is unset.
        if let Ok(identifier) = ObjectIdentifier::builder().key(key).build() {
            self.objects.push(identifier);
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|object| object.key())
    }

    pub fn into_identifiers(self) -> Vec<ObjectIdentifier> {
        self.objects
    }
}

/// Outcome of flushing a [`DeletionBatch`].
///
/// `deleted` holds the keys S3 confirmed, in response order. `failed` holds
/// per-key errors that S3 reported inside an otherwise successful
/// DeleteObjects response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeletionResult {
    pub deleted: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedKey>,
}

impl DeletionResult {
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty()
    }
}

/// A key that S3 refused to delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedKey {
    pub key: String,
    pub error_code: String,
    pub error_message: String,
}
