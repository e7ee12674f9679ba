use crate::alias::AliasEntry;
use crate::error::{LoadError, MalformedAliasError};
use indexmap::IndexMap;
use toml_edit::{DocumentMut, Item};
use tracing::{debug, info, warn};

pub const COMMANDS_SECTION: &str = "commands";

/// Every loaded alias, keyed by lowercase label, in declaration order.
#[derive(Debug, Default, Clone)]
pub struct AliasRegistry {
    aliases: IndexMap<String, AliasEntry>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry`, replacing and returning any entry with the same label.
    pub fn insert(&mut self, entry: AliasEntry) -> Option<AliasEntry> {
        self.aliases.insert(entry.label().to_string(), entry)
    }

    pub fn get(&self, label: &str) -> Option<&AliasEntry> {
        self.aliases.get(&label.to_lowercase())
    }

    pub(crate) fn get_mut(&mut self, label: &str) -> Option<&mut AliasEntry> {
        self.aliases.get_mut(&label.to_lowercase())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.aliases.contains_key(&label.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasEntry> {
        self.aliases.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    /// Every alias `input` names by label or trigger, in declaration order.
    pub fn find_by_trigger<'a>(
        &'a self,
        input: &str,
    ) -> impl Iterator<Item = &'a AliasEntry> + use<'a> {
        let input = input.to_lowercase();
        self.aliases
            .values()
            .filter(move |entry| entry.matches(&input))
    }
}

/// The result of a load pass that got as far as enumerating the aliases.
#[derive(Debug, Default)]
pub struct LoadedAliases {
    pub registry: AliasRegistry,
    /// One entry per declared alias that was skipped.
    pub diagnostics: Vec<MalformedAliasError>,
}

/// Builds a fresh registry from the `commands` section of `doc`.
///
/// A malformed alias is reported in [`LoadedAliases::diagnostics`] and
/// skipped. When two keys end up with the same label the one declared last
/// wins.
pub fn load_aliases(doc: &DocumentMut) -> Result<LoadedAliases, LoadError> {
    let commands = doc
        .get(COMMANDS_SECTION)
        .and_then(Item::as_table_like)
        .ok_or(LoadError::MissingCommandsSection)?;

    let mut loaded = LoadedAliases::default();
    for (key, item) in commands.iter() {
        if item.is_none() {
            continue;
        }
        match AliasEntry::parse(key, item) {
            Ok(entry) => {
                if let Some(old) = loaded.registry.insert(entry) {
                    debug!("alias '{}' overrides an earlier declaration", old.label());
                }
            }
            Err(err) => {
                warn!("The config is improperly defined! Cannot load alias {key}: {err}");
                loaded.diagnostics.push(err);
            }
        }
    }

    info!(
        "Loaded {} aliases ({} skipped)",
        loaded.registry.len(),
        loaded.diagnostics.len()
    );
    Ok(loaded)
}
