use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A single declared alias could not be turned into an [`AliasEntry`].
///
/// These never abort a load; the entry is skipped and the rest continue.
///
/// [`AliasEntry`]: crate::alias::AliasEntry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedAliasError {
    #[error("alias '{key}' is not a section")]
    NotASection { key: String },
    #[error("alias '{key}' has no label left after removing its type prefix")]
    EmptyLabel { key: String },
    #[error("'{field}' of alias '{key}' must be {expected}")]
    InvalidField {
        key: String,
        field: &'static str,
        expected: &'static str,
    },
}

impl MalformedAliasError {
    /// The key the alias was declared under.
    pub fn key(&self) -> &str {
        match self {
            MalformedAliasError::NotASection { key }
            | MalformedAliasError::EmptyLabel { key }
            | MalformedAliasError::InvalidField { key, .. } => key,
        }
    }

    pub(crate) fn invalid(key: &str, field: &'static str, expected: &'static str) -> Self {
        MalformedAliasError::InvalidField {
            key: key.to_string(),
            field,
            expected,
        }
    }
}

/// Failures that abort a whole load pass. The `Display` text is the
/// diagnostic shown to operators.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Configuration section 'commands' doesn't exist")]
    MissingCommandsSection,
    #[error("Bad config")]
    Syntax(#[source] toml_edit::TomlError),
    #[error("unknown error occurred, check console for details")]
    Unknown(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LoadError {
    pub fn diagnostic(&self) -> String {
        self.to_string()
    }
}

/// Reading the backing text of a [`ConfigStore`](crate::store::ConfigStore) failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config is not valid TOML")]
    Syntax(#[from] toml_edit::TomlError),
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<StoreError> for LoadError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Syntax(err) => LoadError::Syntax(err),
            err @ StoreError::Io { .. } => LoadError::Unknown(Box::new(err)),
        }
    }
}

/// Writing the config back failed. Nothing in memory was changed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to save config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config store rejected the write: {0}")]
    Rejected(String),
    #[error("section for alias '{key}' no longer exists in the config")]
    MissingSection { key: String },
}
