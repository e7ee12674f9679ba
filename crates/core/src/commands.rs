//! The `/ca` administrative command.

use crate::plugin::CommandAlias;
use crate::store::ConfigStore;
use commandalias_text::{strip_color, ColorCode};
use tracing::warn;

pub const RELOAD_PERMISSION: &str = "commandalias.reload";
pub const TOGGLE_PERMISSION: &str = "commandalias.toggle";

const SUB_COMMANDS: [&str; 2] = ["reload", "toggle"];

/// Whoever ran a command.
pub trait CommandSender {
    fn has_permission(&self, permission: &str) -> bool;

    fn send_message(&self, message: &str);
}

/// The server console. It may do anything and can't render colors.
pub struct ConsoleSender;

impl CommandSender for ConsoleSender {
    fn has_permission(&self, _permission: &str) -> bool {
        true
    }

    fn send_message(&self, message: &str) {
        println!("{}", strip_color(message));
    }
}

fn correct_usage() -> String {
    format!(
        "Correct usage: {}/ca <reload | toggle <label>>",
        ColorCode::Gray
    )
}

fn msg<S: ConfigStore>(plugin: &CommandAlias<S>, sender: &dyn CommandSender, message: &str) {
    sender.send_message(&format!("{}{}", plugin.prefix(), message));
}

/// Handles `/ca <args>`.
pub fn execute<S: ConfigStore>(
    plugin: &mut CommandAlias<S>,
    sender: &dyn CommandSender,
    args: &[&str],
) {
    if let Some(error) = plugin.error() {
        msg(
            plugin,
            sender,
            &format!(
                "{}Warning! The plugin has detected an error on start up! Check console. Error description: {}",
                ColorCode::Red,
                error
            ),
        );
    }

    let Some(sub_command) = args.first() else {
        msg(plugin, sender, &correct_usage());
        msg(
            plugin,
            sender,
            &format!(
                "{}Reloads the config, or turns an alias on and off.",
                ColorCode::Gray
            ),
        );
        return;
    };

    match sub_command.to_lowercase().as_str() {
        "reload" => handle_reload(plugin, sender),
        "toggle" => handle_toggle(plugin, sender, args),
        _ => msg(plugin, sender, &correct_usage()),
    }
}

fn handle_reload<S: ConfigStore>(plugin: &mut CommandAlias<S>, sender: &dyn CommandSender) {
    // The message carries its own `{prefix}`.
    if !sender.has_permission(RELOAD_PERMISSION) {
        return sender.send_message(&plugin.no_permission_message());
    }

    plugin.reload();
    if let Some(error) = plugin.error() {
        msg(
            plugin,
            sender,
            &format!(
                "{}Warning! The plugin has detected an error whilst reloading! Check console. Error description: {}",
                ColorCode::Red,
                error
            ),
        );
    }
    msg(plugin, sender, "Reloaded.");
}

fn handle_toggle<S: ConfigStore>(
    plugin: &mut CommandAlias<S>,
    sender: &dyn CommandSender,
    args: &[&str],
) {
    if !sender.has_permission(TOGGLE_PERMISSION) {
        return sender.send_message(&plugin.no_permission_message());
    }

    if let Some(error) = plugin.error() {
        return msg(
            plugin,
            sender,
            &format!(
                "{}Warning! The plugin has detected an error on start up so this sub-command cannot be executed! Check console. Error description: {}",
                ColorCode::Red,
                error
            ),
        );
    }

    let [_, label] = args else {
        return msg(plugin, sender, &correct_usage());
    };

    match plugin.toggle_alias(label) {
        Ok(true) => msg(plugin, sender, &format!("Toggled '{label}'.")),
        Ok(false) => msg(
            plugin,
            sender,
            &format!("Couldn't find alias with the label of '{label}'."),
        ),
        Err(err) => {
            warn!("toggling '{label}' failed: {err}");
            msg(
                plugin,
                sender,
                &format!("{}Couldn't save the config, '{label}' was not toggled.", ColorCode::Red),
            );
        }
    }
}

/// Suggestions for the argument being typed in `/ca <args>`.
pub fn tab_complete<S: ConfigStore>(plugin: &CommandAlias<S>, args: &[&str]) -> Vec<String> {
    match args {
        [typed] => {
            let typed = typed.to_lowercase();
            SUB_COMMANDS
                .iter()
                .filter(|sub_command| sub_command.starts_with(&typed))
                .map(|sub_command| sub_command.to_string())
                .collect()
        }
        [sub_command, typed] if sub_command.eq_ignore_ascii_case("toggle") => {
            let typed = typed.to_lowercase();
            plugin
                .aliases()
                .labels()
                .filter(|label| label.starts_with(&typed))
                .map(str::to_string)
                .collect()
        }
        _ => Vec::new(),
    }
}
