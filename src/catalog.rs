use teloxide::types::BotCommand;

/// Leading character of every command token.
pub const COMMAND_DELIMITER: char = '/';

/// A single command the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// The word a user types, e.g. "/help"
    pub token: &'static str,
    pub description: &'static str,
    /// Reply keyboard button text that maps back to this command, if it has a button
    pub label: Option<&'static str>,
}

const COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor {
        token: "/start",
        description: "Greets and shows the quick actions",
        label: Some("Start"),
    },
    CommandDescriptor {
        token: "/start_with_reply",
        description: "Greets and shows the reply keyboard",
        label: None,
    },
    CommandDescriptor {
        token: "/hello",
        description: "Simple greeter",
        label: Some("Hello"),
    },
    CommandDescriptor {
        token: "/joke",
        description: "Tells a random joke",
        label: Some("Tell me a joke"),
    },
    CommandDescriptor {
        token: "/help",
        description: "Shows available commands",
        label: Some("Help"),
    },
    CommandDescriptor {
        token: "/echo",
        description: "Echo back what you typed",
        label: None,
    },
    CommandDescriptor {
        token: "/name_surname",
        description: "Shows your name and surname",
        label: None,
    },
    CommandDescriptor {
        token: "/chat_id",
        description: "Shows your chat id",
        label: None,
    },
];

/// Ordered, read-only set of commands. Order drives the help text.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    commands: &'static [CommandDescriptor],
}

impl Default for Catalog {
    fn default() -> Self {
        Self { commands: COMMANDS }
    }
}

impl Catalog {
    pub fn commands(&self) -> &'static [CommandDescriptor] {
        self.commands
    }

    /// Case-insensitive exact match on the command token.
    pub fn resolve(&self, token: &str) -> Option<&'static CommandDescriptor> {
        self.commands()
            .iter()
            .find(|c| c.token.eq_ignore_ascii_case(token))
    }

    /// Case-insensitive exact match on the button label. Commands without a button never match.
    pub fn resolve_by_label(&self, label: &str) -> Option<&'static CommandDescriptor> {
        self.commands()
            .iter()
            .find(|c| c.label.is_some_and(|l| l.eq_ignore_ascii_case(label)))
    }

    pub fn help_text(&self) -> String {
        let mut text = String::new();
        for command in self.commands() {
            text.push_str(&format!("{} -> {}\n", command.token, command.description));
        }
        text
    }

    /// Commands in the shape Telegram's `setMyCommands` expects (no leading slash).
    pub fn bot_commands(&self) -> Vec<BotCommand> {
        self.commands()
            .iter()
            .map(|c| {
                BotCommand::new(
                    c.token.trim_start_matches(COMMAND_DELIMITER),
                    c.description,
                )
            })
            .collect()
    }
}
