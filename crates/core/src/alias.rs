//! A single configured alias and how it is read from its config section.

use crate::error::MalformedAliasError;
use commandalias_text::colorize;
use indexmap::IndexMap;
use toml_edit::{Item, TableLike, Value};

pub const ENABLED_KEY: &str = "enabled";
pub const PERMISSION_KEY: &str = "permission";
pub const ALIASES_KEY: &str = "aliases";
pub const CONSOLE_COMMAND_KEY: &str = "console-command";
pub const CONDITIONS_KEY: &str = "conditions";

/// How an alias is triggered. Every type except [`CommandType::Command`] is
/// declared with a prefix on its config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandType {
    #[default]
    Command,
    Chat,
}

impl CommandType {
    /// Prefixed types, in the order they are tried. The first match wins.
    const PREFIXED: [CommandType; 1] = [CommandType::Chat];

    pub fn prefix(self) -> &'static str {
        match self {
            CommandType::Command => "",
            CommandType::Chat => "chat:",
        }
    }

    /// Classifies a declared key, returning the type and the rest of the key.
    pub fn classify(key: &str) -> (CommandType, &str) {
        Self::PREFIXED
            .iter()
            .find_map(|ty| key.strip_prefix(ty.prefix()).map(|rest| (*ty, rest)))
            .unwrap_or((CommandType::Command, key))
    }
}

/// Run conditions, keyed by lowercase name. Values are handed to whoever
/// evaluates them exactly as they were written.
pub type Conditions = IndexMap<String, Item>;

#[derive(Debug, Clone)]
pub struct AliasEntry {
    label: String,
    enabled: bool,
    permission: Option<String>,
    triggers: Vec<String>,
    command_type: CommandType,
    conditions: Conditions,
    console_commands: Vec<String>,
}

impl AliasEntry {
    /// Builds an entry. The label is lowercased and must not be empty.
    pub fn new(
        label: &str,
        enabled: bool,
        permission: Option<String>,
        triggers: Vec<String>,
        command_type: CommandType,
        conditions: Conditions,
        console_commands: Vec<String>,
    ) -> Result<AliasEntry, MalformedAliasError> {
        let label = label.to_lowercase();
        if label.is_empty() {
            return Err(MalformedAliasError::EmptyLabel {
                key: format!("{}{}", command_type.prefix(), label),
            });
        }
        Ok(AliasEntry {
            label,
            enabled,
            permission: permission.filter(|p| !p.is_empty()),
            triggers,
            command_type,
            conditions,
            console_commands,
        })
    }

    /// Reads the section declared as `commands.<key>`.
    pub fn parse(key: &str, item: &Item) -> Result<AliasEntry, MalformedAliasError> {
        let section = item
            .as_table_like()
            .ok_or_else(|| MalformedAliasError::NotASection {
                key: key.to_string(),
            })?;

        let enabled = match field(section, ENABLED_KEY) {
            Some(item) => item
                .as_bool()
                .ok_or_else(|| MalformedAliasError::invalid(key, ENABLED_KEY, "a boolean"))?,
            None => true,
        };

        // Optional fields never reject an alias: scalars are read as text,
        // anything else counts as absent.
        let permission = field(section, PERMISSION_KEY)
            .and_then(Item::as_value)
            .and_then(scalar_text);

        let triggers: Vec<String> = field(section, ALIASES_KEY)
            .and_then(string_list)
            .unwrap_or_default()
            .iter()
            .map(|trigger| colorize(&trigger.to_lowercase()))
            .collect();

        let console_commands = match field(section, CONSOLE_COMMAND_KEY) {
            Some(item) => match item.as_str() {
                Some(command) => vec![command.to_string()],
                None => string_list(item).ok_or_else(|| {
                    MalformedAliasError::invalid(
                        key,
                        CONSOLE_COMMAND_KEY,
                        "a string or a list of strings",
                    )
                })?,
            },
            None => Vec::new(),
        };

        let (command_type, label) = CommandType::classify(key);

        // Anything other than a section is treated as having no conditions.
        let conditions: Conditions = field(section, CONDITIONS_KEY)
            .and_then(Item::as_table_like)
            .map(|conditions| {
                conditions
                    .iter()
                    .filter(|(_, value)| !value.is_none())
                    .map(|(name, value)| (name.to_lowercase(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        AliasEntry::new(
            label,
            enabled,
            permission,
            triggers,
            command_type,
            conditions,
            console_commands,
        )
        .map_err(|_| MalformedAliasError::EmptyLabel {
            key: key.to_string(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    /// Extra trigger strings, lowercased and colorized.
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn console_commands(&self) -> &[String] {
        &self.console_commands
    }

    /// The config key this alias is declared under, with its type prefix put back.
    pub fn serialise_label(&self) -> String {
        format!("{}{}", self.command_type.prefix(), self.label)
    }

    /// Whether `input` names this alias, either by label or by a trigger.
    pub fn matches(&self, input: &str) -> bool {
        let input = input.to_lowercase();
        self.label == input || self.triggers.iter().any(|trigger| *trigger == input)
    }
}

fn field<'a>(section: &'a dyn TableLike, name: &str) -> Option<&'a Item> {
    section.get(name).filter(|item| !item.is_none())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.value().clone()),
        Value::Integer(i) => Some(i.value().to_string()),
        Value::Float(f) => Some(f.value().to_string()),
        Value::Boolean(b) => Some(b.value().to_string()),
        Value::Datetime(d) => Some(d.value().to_string()),
        _ => None,
    }
}

/// Scalar elements as text; nested arrays and tables are skipped.
fn string_list(item: &Item) -> Option<Vec<String>> {
    Some(item.as_array()?.iter().filter_map(scalar_text).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml_edit::DocumentMut;

    fn parse(src: &str, key: &str) -> Result<AliasEntry, MalformedAliasError> {
        let doc = src.parse::<DocumentMut>().unwrap();
        AliasEntry::parse(key, &doc["commands"][key])
    }

    #[test]
    fn classify_strips_known_prefix() {
        assert_eq!(CommandType::classify("chat:greet"), (CommandType::Chat, "greet"));
        assert_eq!(CommandType::classify("heal"), (CommandType::Command, "heal"));
        assert_eq!(CommandType::classify("Chat:greet"), (CommandType::Command, "Chat:greet"));
    }

    #[test]
    fn parses_plain_command() {
        let entry = parse(
            r#"
            [commands.heal]
            enabled = true
            permission = "ca.heal"
            console-command = "heal {player}"
            "#,
            "heal",
        )
        .unwrap();
        assert_eq!(entry.label(), "heal");
        assert!(entry.is_enabled());
        assert_eq!(entry.permission(), Some("ca.heal"));
        assert_eq!(entry.console_commands(), ["heal {player}"]);
        assert_eq!(entry.command_type(), CommandType::Command);
        assert_eq!(entry.serialise_label(), "heal");
    }

    #[test]
    fn parses_chat_alias_with_defaults() {
        let entry = parse(
            r#"
            [commands."chat:greet"]
            aliases = ["HI", "&aHello"]
            "#,
            "chat:greet",
        )
        .unwrap();
        assert_eq!(entry.label(), "greet");
        assert_eq!(entry.command_type(), CommandType::Chat);
        assert_eq!(entry.serialise_label(), "chat:greet");
        assert!(entry.is_enabled());
        assert_eq!(entry.permission(), None);
        assert_eq!(entry.triggers(), ["hi", "§ahello"]);
        assert!(entry.console_commands().is_empty());
        assert!(entry.conditions().is_empty());
    }

    #[test]
    fn console_command_accepts_scalar_or_list() {
        let src = r#"
            [commands.one]
            console-command = "say hi"
            [commands.two]
            console-command = ["say hi", "say bye"]
            [commands.blank]
            console-command = ""
        "#;
        assert_eq!(parse(src, "one").unwrap().console_commands().len(), 1);
        assert_eq!(parse(src, "two").unwrap().console_commands(), ["say hi", "say bye"]);
        assert_eq!(parse(src, "blank").unwrap().console_commands(), [""]);
    }

    #[test]
    fn conditions_are_lowercased_and_passed_through() {
        let entry = parse(
            r#"
            [commands.spawn]
            [commands.spawn.conditions]
            World = "lobby"
            min-level = 5
            nested = { a = 1 }
            "#,
            "spawn",
        )
        .unwrap();
        let keys: Vec<_> = entry.conditions().keys().cloned().collect();
        assert_eq!(keys, ["world", "min-level", "nested"]);
        assert_eq!(entry.conditions()["world"].as_str(), Some("lobby"));
        assert_eq!(entry.conditions()["min-level"].as_integer(), Some(5));
        assert!(entry.conditions()["nested"].is_inline_table());
    }

    #[test]
    fn rejects_unreadable_fields() {
        let src = r#"
            [commands]
            number = 3
            [commands.flag]
            enabled = "yes"
            [commands.console]
            console-command = 42
            [commands."chat:"]
        "#;
        assert!(matches!(
            parse(src, "number"),
            Err(MalformedAliasError::NotASection { .. })
        ));
        assert_eq!(
            parse(src, "flag").unwrap_err(),
            MalformedAliasError::invalid("flag", ENABLED_KEY, "a boolean")
        );
        assert!(parse(src, "console").is_err());
        assert_eq!(
            parse(src, "chat:").unwrap_err(),
            MalformedAliasError::EmptyLabel {
                key: "chat:".to_string()
            }
        );
    }

    #[test]
    fn mistyped_optional_fields_keep_the_alias() {
        let src = r#"
            [commands.heal]
            permission = 1
            [commands.spawn]
            aliases = "lobby"
            permission = ["a", "b"]
            [commands.fly]
            aliases = ["F", 2, true, ["nested"]]
            console-command = ["fly", 3]
        "#;
        let heal = parse(src, "heal").unwrap();
        assert_eq!(heal.permission(), Some("1"));

        let spawn = parse(src, "spawn").unwrap();
        assert!(spawn.triggers().is_empty());
        assert_eq!(spawn.permission(), None);

        let fly = parse(src, "fly").unwrap();
        assert_eq!(fly.triggers(), ["f", "2", "true"]);
        assert_eq!(fly.console_commands(), ["fly", "3"]);
    }

    #[test]
    fn matches_label_and_triggers_case_insensitively() {
        let entry = AliasEntry::new(
            "Greet",
            true,
            Some(String::new()),
            vec!["hi".to_string()],
            CommandType::Chat,
            Conditions::new(),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(entry.label(), "greet");
        assert_eq!(entry.permission(), None);
        assert!(entry.matches("GREET"));
        assert!(entry.matches("Hi"));
        assert!(!entry.matches("hello"));
    }
}
