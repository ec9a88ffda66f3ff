//! Configuration types for a barcode rename batch.
//!
//! All batch behaviour is controlled through [`RenameConfig`], built via its
//! [`RenameConfigBuilder`]. Keeping every knob in one struct makes it easy to
//! share a config between the CLI and library callers and to restate the
//! active policy in the batch summary.

use crate::error::RenameError;
use crate::pipeline::decode::BarcodeDecoder;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Configuration for a rename batch.
///
/// Built via [`RenameConfig::builder()`] or using [`RenameConfig::default()`].
///
/// # Example
/// ```rust
/// use barcode_rename::{LengthPolicy, RenameConfig};
///
/// let config = RenameConfig::builder()
///     .length_policy(LengthPolicy::new(8, 13))
///     .max_retries(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.length_policy.max_len, 13);
/// ```
#[derive(Clone)]
pub struct RenameConfig {
    /// Accepted barcode length range. Default: 10–12 characters.
    pub length_policy: LengthPolicy,

    /// What to do with decoded text that is not a safe file name. Default: [`NamePolicy::Reject`].
    pub name_policy: NamePolicy,

    /// Upper bound on `_N` disambiguation suffixes tried per file. Default: 10 000.
    pub max_collision_attempts: u32,

    /// Retries of a rename that failed with a transient "file busy" error. Default: 3.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds, doubled after each attempt. Default: 100.
    pub retry_backoff_ms: u64,

    /// Unconditional pause before every rename. Default: 0 (disabled).
    pub settle_delay_ms: u64,

    /// Decoder used for every image. If None, the built-in `rxing` decoder is used.
    pub decoder: Option<Arc<dyn BarcodeDecoder>>,

    /// Receives per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            length_policy: LengthPolicy::default(),
            name_policy: NamePolicy::default(),
            max_collision_attempts: 10_000,
            max_retries: 3,
            retry_backoff_ms: 100,
            settle_delay_ms: 0,
            decoder: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RenameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenameConfig")
            .field("length_policy", &self.length_policy)
            .field("name_policy", &self.name_policy)
            .field("max_collision_attempts", &self.max_collision_attempts)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("settle_delay_ms", &self.settle_delay_ms)
            .field("decoder", &self.decoder.as_ref().map(|_| "<dyn BarcodeDecoder>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl RenameConfig {
    /// Create a new builder for `RenameConfig`.
    pub fn builder() -> RenameConfigBuilder {
        RenameConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RenameConfig`].
pub struct RenameConfigBuilder {
    config: RenameConfig,
}

impl RenameConfigBuilder {
    pub fn length_policy(mut self, policy: LengthPolicy) -> Self {
        self.config.length_policy = policy;
        self
    }

    pub fn name_policy(mut self, policy: NamePolicy) -> Self {
        self.config.name_policy = policy;
        self
    }

    pub fn max_collision_attempts(mut self, n: u32) -> Self {
        self.config.max_collision_attempts = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.config.settle_delay_ms = ms;
        self
    }

    pub fn decoder(mut self, decoder: Arc<dyn BarcodeDecoder>) -> Self {
        self.config.decoder = Some(decoder);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenameConfig, RenameError> {
        let c = &self.config;
        let LengthPolicy { min_len, max_len } = c.length_policy;
        if min_len == 0 {
            return Err(RenameError::InvalidConfig("min_len must be ≥ 1".into()));
        }
        if min_len > max_len {
            return Err(RenameError::InvalidConfig(format!(
                "min_len ({min_len}) must not exceed max_len ({max_len})"
            )));
        }
        if c.max_collision_attempts == 0 {
            return Err(RenameError::InvalidConfig(
                "max_collision_attempts must be ≥ 1".into(),
            ));
        }
        if let NamePolicy::Replace(ch) = c.name_policy {
            if is_unsafe_char(ch) {
                return Err(RenameError::InvalidConfig(format!(
                    "replacement character {ch:?} is itself not allowed in file names"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Policies ─────────────────────────────────────────────────────────────

/// Inclusive bounds on the character count of an acceptable barcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthPolicy {
    pub min_len: usize,
    pub max_len: usize,
}

impl LengthPolicy {
    pub const DEFAULT_MIN: usize = 10;
    pub const DEFAULT_MAX: usize = 12;

    pub fn new(min_len: usize, max_len: usize) -> Self {
        Self { min_len, max_len }
    }

    /// `true` when `text` has between `min_len` and `max_len` characters.
    pub fn accepts(&self, text: &str) -> bool {
        let len = text.chars().count();
        self.min_len <= len && len <= self.max_len
    }
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

impl fmt::Display for LengthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} characters", self.min_len, self.max_len)
    }
}

/// How decoded text that is not a safe file name is handled.
///
/// | Policy | `AB/12:34` becomes |
/// |--------|--------------------|
/// | `Reject` | per-file error, file left untouched (default) |
/// | `Replace('_')` | `AB_12_34` |
/// | `Verbatim` | used as-is; the rename will usually fail or escape the folder |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamePolicy {
    #[default]
    Reject,
    Replace(char),
    Verbatim,
}

/// Characters that are rejected or replaced in file names on any platform.
pub(crate) fn is_unsafe_char(c: char) -> bool {
    matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control()
}
