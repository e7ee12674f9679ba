use commandalias_core::commands::CommandSender;
use commandalias_core::{CommandAlias, MemoryStore};
use commandalias_text::strip_color;
use std::cell::RefCell;
use std::collections::HashSet;

pub const SAMPLE_CONFIG: &str = r#"
prefix = "&7[CA] "
noPermission = "{prefix}&cNo permission!"

[advanced]
keep-iterating-when-match = false
let-command-event-run-if-no-perm = false

[commands.heal]
enabled = true
permission = "ca.heal"
console-command = "heal {player}"

[commands."chat:greet"]
aliases = ["hi", "hello"]
console-command = ["say hi", "say bye"]

[commands.spawn]
enabled = false
aliases = ["lobby"]

[commands.spawn.conditions]
World = "survival"
"#;

/// A sender that remembers what it was told, with colors stripped.
#[derive(Default)]
pub struct TestSender {
    permissions: HashSet<String>,
    messages: RefCell<Vec<String>>,
}

impl TestSender {
    pub fn with_permissions(permissions: &[&str]) -> Self {
        Self {
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

impl CommandSender for TestSender {
    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    fn send_message(&self, message: &str) {
        self.messages.borrow_mut().push(strip_color(message));
    }
}

pub fn enable(source: &str) -> CommandAlias<MemoryStore> {
    CommandAlias::enable(MemoryStore::new(source))
}

/// Changes the backing text and reloads, as an operator editing the file would.
pub fn edit_and_reload(plugin: &mut CommandAlias<MemoryStore>, source: &str) {
    plugin.config_mut().store_mut().set_source(source);
    plugin.reload();
}
