use crate::alias::AliasEntry;
use crate::config::AliasConfig;
use crate::error::{LoadError, MalformedAliasError, PersistenceError};
use crate::registry::{AliasRegistry, LoadedAliases};
use crate::store::ConfigStore;
use tracing::{error, info};

/// What a reload did, for whoever asked for it.
#[derive(Debug)]
pub struct ReloadReport {
    pub loaded: usize,
    pub malformed: Vec<MalformedAliasError>,
    pub error: Option<LoadError>,
}

impl ReloadReport {
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty() && self.error.is_none()
    }
}

/// Owns the config, the live alias registry and the last error detected
/// while loading.
pub struct CommandAlias<S> {
    config: AliasConfig<S>,
    aliases: AliasRegistry,
    error: Option<String>,
}

impl<S: ConfigStore> CommandAlias<S> {
    /// Reads the config for the first time and loads every alias from it.
    pub fn enable(store: S) -> Self {
        let mut plugin = Self {
            config: AliasConfig::new(store),
            aliases: AliasRegistry::new(),
            error: None,
        };
        let report = match plugin.config.init() {
            Ok(()) => plugin.load(),
            Err(err) => {
                error!("error loading config, please restart! {err}");
                plugin.fail(err)
            }
        };
        info!("Enabled with {} aliases", report.loaded);
        plugin
    }

    /// Re-reads the config and replaces the registry.
    pub fn reload(&mut self) -> ReloadReport {
        match self.config.reload_file() {
            Ok(()) => self.load(),
            Err(err) => self.fail(err),
        }
    }

    fn load(&mut self) -> ReloadReport {
        self.error = None;
        match self.config.load_aliases() {
            Ok(LoadedAliases {
                registry,
                diagnostics,
            }) => {
                if let Some(err) = diagnostics.last() {
                    self.error = Some(format!("Failed to set alias instance ({err})"));
                }
                let loaded = registry.len();
                self.aliases = registry;
                ReloadReport {
                    loaded,
                    malformed: diagnostics,
                    error: None,
                }
            }
            Err(err) => {
                error!("The config is improperly defined! {err}");
                self.fail(err)
            }
        }
    }

    fn fail(&mut self, err: LoadError) -> ReloadReport {
        self.error = Some(err.diagnostic());
        self.aliases = AliasRegistry::new();
        ReloadReport {
            loaded: 0,
            malformed: Vec::new(),
            error: Some(err),
        }
    }

    /// Flips an alias between enabled and disabled. Returns `Ok(false)` if no
    /// alias has that label.
    pub fn toggle_alias(&mut self, label: &str) -> Result<bool, PersistenceError> {
        self.config.toggle_alias(&mut self.aliases, label)
    }

    /// The enabled aliases `input` names, in declaration order. Stops after
    /// the first one unless the config says to keep iterating.
    pub fn matching(&self, input: &str) -> Vec<&AliasEntry> {
        let matches = self
            .aliases
            .find_by_trigger(input)
            .filter(|entry| entry.is_enabled());
        if self.config.is_break_after_match() {
            matches.take(1).collect()
        } else {
            matches.collect()
        }
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    pub fn config(&self) -> &AliasConfig<S> {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AliasConfig<S> {
        &mut self.config
    }

    /// The last error detected while loading, cleared by a successful reload.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn prefix(&self) -> String {
        self.config.prefix()
    }

    pub fn no_permission_message(&self) -> String {
        self.config.no_permission_message()
    }
}
