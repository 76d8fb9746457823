//! Transport planning.

use alttext_core::TransportPlan;
use alttext_error::{ConfigError, ValidationError, ValidationErrorKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Largest payload sent inline by default (20 MiB).
pub const INLINE_MAX_BYTES: u64 = 20 * 1024 * 1024;

/// Largest payload accepted at all by default (100 MiB).
pub const UPLOAD_MAX_BYTES: u64 = 100 * 1024 * 1024;

/// Size thresholds that decide how a payload reaches the backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct TransportLimits {
    /// Payloads up to this size are always sent inline
    #[serde(default = "default_inline_max")]
    inline_max_bytes: u64,

    /// Payloads above this size are rejected
    #[serde(default = "default_upload_max")]
    upload_max_bytes: u64,
}

fn default_inline_max() -> u64 {
    INLINE_MAX_BYTES
}

fn default_upload_max() -> u64 {
    UPLOAD_MAX_BYTES
}

impl Default for TransportLimits {
    fn default() -> Self {
        Self {
            inline_max_bytes: INLINE_MAX_BYTES,
            upload_max_bytes: UPLOAD_MAX_BYTES,
        }
    }
}

impl TransportLimits {
    /// Check that the inline threshold does not exceed the upload maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inline_max_bytes > self.upload_max_bytes {
            return Err(ConfigError::new(format!(
                "transport.inline_max_bytes ({}) exceeds transport.upload_max_bytes ({})",
                self.inline_max_bytes, self.upload_max_bytes
            )));
        }
        Ok(())
    }

    /// Choose a transport for a payload of `size` bytes.
    ///
    /// Between the two thresholds the caller's compression preference
    /// decides: preferred keeps the payload inline, otherwise it is uploaded.
    ///
    /// # Errors
    ///
    /// Payloads larger than the upload maximum are rejected before any
    /// transport is attempted.
    ///
    /// # Examples
    ///
    /// ```
    /// use alttext_core::TransportPlan;
    /// use alttext_dispatch::TransportLimits;
    ///
    /// let limits = TransportLimits::default();
    /// assert_eq!(limits.plan(1024, false).unwrap(), TransportPlan::Inline);
    /// assert_eq!(limits.plan(30 * 1024 * 1024, false).unwrap(), TransportPlan::RemoteUpload);
    /// assert_eq!(limits.plan(30 * 1024 * 1024, true).unwrap(), TransportPlan::Inline);
    /// assert!(limits.plan(101 * 1024 * 1024, true).is_err());
    /// ```
    pub fn plan(&self, size: u64, compression_preferred: bool) -> Result<TransportPlan, ValidationError> {
        let plan = if size <= self.inline_max_bytes {
            TransportPlan::Inline
        } else if size <= self.upload_max_bytes {
            if compression_preferred {
                TransportPlan::Inline
            } else {
                TransportPlan::RemoteUpload
            }
        } else {
            return Err(ValidationError::new(ValidationErrorKind::PayloadTooLarge {
                size,
                max: self.upload_max_bytes,
            }));
        };

        tracing::debug!(size, compression_preferred, %plan, "Planned transport");
        Ok(plan)
    }
}
