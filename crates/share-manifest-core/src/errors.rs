use std::io;
use thiserror::Error;

/// Errors that can occur while recording or registering manifests
#[derive(Error, Debug)]
pub enum ShareManifestError {
    /// A caller-supplied alias key is already bound to another manifest.
    /// Raised synchronously at registration time, never deferred to build
    /// time.
    #[error("key \"{key}\" is already used, please use a different key")]
    DuplicateKey { key: String },

    #[error("failed to create change-notifier sentinel: {0}")]
    Sentinel(#[from] io::Error),
}
