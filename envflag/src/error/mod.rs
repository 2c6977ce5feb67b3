//! Error types produced while applying environment overrides.

use thiserror::Error;

/// Errors that can occur while applying environment values to flags.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnvFlagError {
    /// A value read from the environment was rejected by the flag's parser.
    #[error("invalid value {value:?} for environment variable {key:?}: {source}")]
    InvalidValue {
        /// Name of the flag the value was destined for.
        flag: String,
        /// Environment key the value was read from.
        key: String,
        /// The rejected value.
        value: String,
        /// Error reported by the flag registry.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EnvFlagError {
    /// Builds an [`EnvFlagError::InvalidValue`].
    #[must_use]
    pub fn invalid_value<E>(
        flag: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        source: E,
    ) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::InvalidValue {
            flag: flag.into(),
            key: key.into(),
            value: value.into(),
            source: source.into(),
        }
    }

    /// Environment key involved in the failure.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidValue { key, .. } => key,
        }
    }

    /// Flag involved in the failure.
    #[must_use]
    pub fn flag(&self) -> &str {
        match self {
            Self::InvalidValue { flag, .. } => flag,
        }
    }
}
