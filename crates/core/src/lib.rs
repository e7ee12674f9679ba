#![deny(rust_2018_idioms)]

pub mod alias;
pub mod commands;
pub mod config;
pub mod error;
pub mod plugin;
pub mod registry;
pub mod store;

pub use alias::{AliasEntry, CommandType};
pub use config::AliasConfig;
pub use error::{LoadError, MalformedAliasError, PersistenceError, StoreError};
pub use plugin::{CommandAlias, ReloadReport};
pub use registry::{load_aliases, AliasRegistry, LoadedAliases};
pub use store::{ConfigStore, FileStore, MemoryStore};
