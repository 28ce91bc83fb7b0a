//! Recorder sizing parameters.
//!
//! Nothing here changes the produced bytes; the values only presize the
//! recorder's buffers so that a scan of a known-large source does not keep
//! regrowing them.

use preparse_util::DEFAULT_CHUNK_SIZE;

/// Largest accepted literal arena chunk.
pub const MAX_LITERAL_CHUNK_SIZE: usize = 1024 * 1024;

/// Initial capacities for a [`Recorder`](crate::Recorder).
///
/// # Examples
///
/// ```rust
/// use preparse_data::{Recorder, RecorderConfig};
///
/// let config = RecorderConfig {
///     expected_symbols: 4096,
///     ..Default::default()
/// };
/// let recorder = Recorder::with_config(&config).unwrap();
/// assert!(!recorder.has_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Initial function region capacity in cells.
    ///
    /// Default: 256
    pub function_capacity: usize,

    /// Initial symbol region capacity in bytes.
    ///
    /// Default: 1024
    pub symbol_capacity: usize,

    /// Literal arena chunk size in bytes.
    ///
    /// Literals longer than this get a chunk of their own.
    /// Default: 4KB
    pub literal_chunk_size: usize,

    /// Expected number of distinct symbols.
    ///
    /// Default: 128
    pub expected_symbols: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        RecorderConfig {
            function_capacity: 256,
            symbol_capacity: 1024,
            literal_chunk_size: DEFAULT_CHUNK_SIZE,
            expected_symbols: 128,
        }
    }
}

impl RecorderConfig {
    /// Checks that every value is usable.
    ///
    /// ```rust
    /// use preparse_data::RecorderConfig;
    ///
    /// let config = RecorderConfig {
    ///     literal_chunk_size: 0,
    ///     ..Default::default()
    /// };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.literal_chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(
                "literal_chunk_size must be > 0".to_string(),
            ));
        }

        if self.literal_chunk_size > MAX_LITERAL_CHUNK_SIZE {
            return Err(ConfigError::InvalidChunkSize(format!(
                "literal_chunk_size must be <= {}",
                MAX_LITERAL_CHUNK_SIZE
            )));
        }

        Ok(())
    }

    /// Builds a configuration from environment variables
    ///
    /// Overrides defaults with:
    /// - PREPARSE_FUNCTION_CAPACITY
    /// - PREPARSE_SYMBOL_CAPACITY
    /// - PREPARSE_LITERAL_CHUNK
    /// - PREPARSE_EXPECTED_SYMBOLS
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(value) = env_usize("PREPARSE_FUNCTION_CAPACITY") {
            config.function_capacity = value;
        }

        if let Some(value) = env_usize("PREPARSE_SYMBOL_CAPACITY") {
            config.symbol_capacity = value;
        }

        if let Some(value) = env_usize("PREPARSE_LITERAL_CHUNK") {
            config.literal_chunk_size = value;
        }

        if let Some(value) = env_usize("PREPARSE_EXPECTED_SYMBOLS") {
            config.expected_symbols = value;
        }

        config
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// Error types for configuration
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid literal chunk size: {0}")]
    InvalidChunkSize(String),
}
