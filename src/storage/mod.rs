//! Storage access tokens.
//!
//! Submissions reference input and output data through scoped,
//! time-limited tokens. When the user supplies an account key instead of
//! tokens, a [`TokenIssuer`] creates them.

mod sas;

pub use sas::{AccountKeySigner, SIGNED_VERSION};

use crate::constants::retry;
use crate::error::{Error, Result};
use std::time::Duration;
use tracing::warn;

/// Permissions requested for a container token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerAccess {
    /// Allow writing and deleting blobs.
    pub write: bool,
    /// Allow listing blobs.
    pub list: bool,
}

impl ContainerAccess {
    /// Permission string in service order (`r`, `w`, `d`, `l`).
    pub fn permissions(self) -> String {
        let mut permissions = String::from("r");
        if self.write {
            permissions.push_str("wd");
        }
        if self.list {
            permissions.push('l');
        }
        permissions
    }
}

/// Creates access tokens from a storage account key.
pub trait TokenIssuer {
    /// Read-only token for a single blob.
    fn blob_read_token(
        &self,
        account: &str,
        key: &str,
        container: &str,
        blob: &str,
        hours: u32,
    ) -> Result<String>;

    /// Token for a whole container.
    fn container_token(
        &self,
        account: &str,
        key: &str,
        container: &str,
        hours: u32,
        access: ContainerAccess,
    ) -> Result<String>;
}

/// Retries a [`TokenIssuer`] a fixed number of times before giving up.
///
/// Persistent failure is reported as [`Error::Storage`].
#[derive(Debug, Clone)]
pub struct RetryingIssuer<T> {
    inner: T,
    max_retries: u32,
    delay: Duration,
}

impl<T: TokenIssuer> RetryingIssuer<T> {
    /// Wrap `inner` with the default retry count and delay.
    pub fn new(inner: T) -> Self {
        Self::with_policy(inner, retry::STORAGE_MAX_RETRIES, retry::STORAGE_DELAY)
    }

    /// Wrap `inner` with an explicit retry count and delay.
    pub fn with_policy(inner: T, max_retries: u32, delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            delay,
        }
    }

    fn run<F>(&self, mut issue: F) -> Result<String>
    where
        F: FnMut(&T) -> Result<String>,
    {
        let mut retries = 0;
        loop {
            match issue(&self.inner) {
                Ok(token) => return Ok(token),
                Err(e) => {
                    retries += 1;
                    let reason = match e {
                        Error::Storage { reason } => reason,
                        other => other.to_string(),
                    };
                    if retries > self.max_retries {
                        return Err(Error::Storage { reason });
                    }
                    warn!("Storage error: {reason}");
                    std::thread::sleep(self.delay);
                }
            }
        }
    }
}

impl<T: TokenIssuer> TokenIssuer for RetryingIssuer<T> {
    fn blob_read_token(
        &self,
        account: &str,
        key: &str,
        container: &str,
        blob: &str,
        hours: u32,
    ) -> Result<String> {
        self.run(|inner| inner.blob_read_token(account, key, container, blob, hours))
    }

    fn container_token(
        &self,
        account: &str,
        key: &str,
        container: &str,
        hours: u32,
        access: ContainerAccess,
    ) -> Result<String> {
        self.run(|inner| inner.container_token(account, key, container, hours, access))
    }
}
