use crate::alias::{AliasEntry, CommandType, ENABLED_KEY};
use crate::error::{LoadError, PersistenceError};
use crate::registry::{load_aliases, AliasRegistry, LoadedAliases, COMMANDS_SECTION};
use crate::store::ConfigStore;
use commandalias_text::colorize;
use toml_edit::{table, value, DocumentMut, Item, Table};
use tracing::{debug, error};

pub const DEFAULT_PREFIX: &str = "&7[&aCommandAlias&7] &c";
pub const DEFAULT_NO_PERMISSION: &str = "{prefix}No permission!";
pub const PREFIX_PLACEHOLDER: &str = "{prefix}";

const PREFIX_KEY: &str = "prefix";
const NO_PERMISSION_KEY: &str = "noPermission";
const ADVANCED_SECTION: &str = "advanced";
const KEEP_ITERATING_KEY: &str = "keep-iterating-when-match";
const RUN_IF_NO_PERMISSION_KEY: &str = "let-command-event-run-if-no-perm";

trait ConfigSerializeDefault {
    /// Writes `self` at `path` unless something is already there. Returns
    /// whether the document changed.
    fn fix_config(self, path: &[&str], doc: &mut DocumentMut) -> bool;
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, path: &[&str], doc: &mut DocumentMut) -> bool {
                    let Some((name, parents)) = path.split_last() else {
                        return false;
                    };
                    let mut section: &mut Table = doc.as_table_mut();
                    for parent in parents {
                        let item = section.entry(parent).or_insert_with(table);
                        let Some(next) = item.as_table_mut() else {
                            return false;
                        };
                        section = next;
                    }
                    if section.contains_key(name) {
                        return false;
                    }
                    section.insert(name, value(self));
                    true
                }
            }
        )*
    }
}

impl_simple_default!(&str, bool);

/// Adds every setting the file is missing. Returns whether anything changed.
fn patch_defaults(doc: &mut DocumentMut) -> bool {
    let mut changes = false;
    if !doc.get(COMMANDS_SECTION).is_some_and(Item::is_table_like) {
        doc.insert(COMMANDS_SECTION, table());
        changes = true;
    }
    changes |= DEFAULT_PREFIX.fix_config(&[PREFIX_KEY], doc);
    changes |= DEFAULT_NO_PERMISSION.fix_config(&[NO_PERMISSION_KEY], doc);
    changes |= false.fix_config(&[ADVANCED_SECTION, KEEP_ITERATING_KEY], doc);
    changes |= false.fix_config(&[ADVANCED_SECTION, RUN_IF_NO_PERMISSION_KEY], doc);
    changes
}

fn get_path<'a>(doc: &'a DocumentMut, path: &[&str]) -> Option<&'a Item> {
    let (first, rest) = path.split_first()?;
    let mut item = doc.get(first)?;
    for segment in rest {
        item = item.as_table_like()?.get(segment)?;
    }
    Some(item).filter(|item| !item.is_none())
}

/// The alias config: settings, alias definitions and the store they live in.
pub struct AliasConfig<S> {
    store: S,
}

impl<S: ConfigStore> AliasConfig<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// First read of the store. Any missing settings are written back with
    /// their defaults.
    pub fn init(&mut self) -> Result<(), LoadError> {
        self.store.reload()?;
        if patch_defaults(self.store.document_mut()) {
            if let Err(err) = self.store.save() {
                error!("error saving default config values: {err}");
            }
        }
        Ok(())
    }

    /// Re-reads the store. On failure the previously read document is kept.
    pub fn reload_file(&mut self) -> Result<(), LoadError> {
        self.store.reload().map_err(|err| {
            error!("error reloading config due to something you did, please fix and try again: {err}");
            LoadError::from(err)
        })
    }

    /// Builds a fresh registry from the current document.
    pub fn load_aliases(&self) -> Result<LoadedAliases, LoadError> {
        load_aliases(self.store.document())
    }

    /// Flips the enabled state of `label`, both in the config and in `aliases`.
    ///
    /// Returns `Ok(false)` without touching anything when no such alias is
    /// loaded. If the config can't be saved the document is rolled back and
    /// the loaded alias keeps its old state.
    pub fn toggle_alias(
        &mut self,
        aliases: &mut AliasRegistry,
        label: &str,
    ) -> Result<bool, PersistenceError> {
        let Some(alias) = aliases.get_mut(label) else {
            return Ok(false);
        };
        let enabled = !alias.is_enabled();
        let key = self.declared_key(alias)?;

        let previous = self.write_enabled(&key, Some(value(enabled)))?;
        if let Err(err) = self.store.save() {
            error!("could not save toggled alias '{key}': {err}");
            self.write_enabled(&key, previous)?;
            return Err(err);
        }

        alias.set_enabled(enabled);
        debug!("alias '{key}' is now {}", if enabled { "enabled" } else { "disabled" });
        Ok(true)
    }

    /// Finds the key under `commands` that `alias` was loaded from. Keys are
    /// matched case-insensitively since labels are lowercased on load, and
    /// the last match wins, like it does when loading.
    fn declared_key(&self, alias: &AliasEntry) -> Result<String, PersistenceError> {
        let serialised = alias.serialise_label();
        let missing = || PersistenceError::MissingSection {
            key: serialised.clone(),
        };
        let commands = self
            .store
            .document()
            .get(COMMANDS_SECTION)
            .and_then(Item::as_table_like)
            .ok_or_else(missing)?;
        commands
            .iter()
            .filter(|(key, item)| {
                item.is_table_like()
                    && CommandType::classify(key).0 == alias.command_type()
                    && key.to_lowercase() == serialised
            })
            .map(|(key, _)| key)
            .last()
            .map(str::to_string)
            .ok_or_else(missing)
    }

    /// Sets (or with `None`, removes) `commands.<key>.enabled`, returning what was there.
    fn write_enabled(
        &mut self,
        key: &str,
        enabled: Option<Item>,
    ) -> Result<Option<Item>, PersistenceError> {
        let section = self
            .store
            .document_mut()
            .get_mut(COMMANDS_SECTION)
            .and_then(Item::as_table_like_mut)
            .and_then(|commands| commands.get_mut(key))
            .and_then(Item::as_table_like_mut)
            .ok_or_else(|| PersistenceError::MissingSection {
                key: key.to_string(),
            })?;
        Ok(match enabled {
            Some(enabled) => section.insert(ENABLED_KEY, enabled),
            None => section.remove(ENABLED_KEY),
        })
    }

    fn get_string(&self, path: &[&str]) -> Option<&str> {
        get_path(self.store.document(), path).and_then(Item::as_str)
    }

    fn get_bool(&self, path: &[&str], default: bool) -> bool {
        get_path(self.store.document(), path)
            .and_then(Item::as_bool)
            .unwrap_or(default)
    }

    /// The colorized prefix put in front of every message.
    pub fn prefix(&self) -> String {
        colorize(self.get_string(&[PREFIX_KEY]).unwrap_or(DEFAULT_PREFIX))
    }

    /// The colorized message shown when a sender lacks a permission.
    pub fn no_permission_message(&self) -> String {
        let message = self
            .get_string(&[NO_PERMISSION_KEY])
            .unwrap_or(DEFAULT_NO_PERMISSION);
        colorize(&message.replace(PREFIX_PLACEHOLDER, &self.prefix()))
    }

    /// Whether matching stops at the first alias that matches.
    pub fn is_break_after_match(&self) -> bool {
        !self.get_bool(&[ADVANCED_SECTION, KEEP_ITERATING_KEY], false)
    }

    /// Whether the host still runs its own command when the sender lacks the
    /// alias permission.
    pub fn is_run_host_command_if_no_permission(&self) -> bool {
        self.get_bool(&[ADVANCED_SECTION, RUN_IF_NO_PERMISSION_KEY], false)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
