/// Button on an inline keyboard. Tapping it delivers `callback_key` back to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_key: String,
    pub url: Option<String>,
}

impl InlineButton {
    pub fn callback(label: &str, callback_key: &str) -> Self {
        Self {
            label: label.to_string(),
            callback_key: callback_key.to_string(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}

/// Persistent keyboard whose buttons send their label as a new message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<String>>,
    pub resizable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Keyboard {
    #[default]
    None,
    Reply(ReplyKeyboard),
    Inline(Vec<Vec<InlineButton>>),
}

/// A single message going back to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub chat_id: String,
    pub text: String,
    pub keyboard: Keyboard,
}

impl OutboundReply {
    pub fn text(chat_id: &str, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            text: text.into(),
            keyboard: Keyboard::None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = keyboard;
        self
    }
}

pub const HELLO_CALLBACK: &str = "hello_callback";
pub const HELP_CALLBACK: &str = "help_callback";
pub const ANOTHER_JOKE_CALLBACK: &str = "another_joke";

/// Quick actions attached under greetings and jokes: one row, three buttons.
pub fn inline_keyboard(help_url: &str) -> Keyboard {
    Keyboard::Inline(vec![vec![
        InlineButton::callback("Say Hello", HELLO_CALLBACK),
        InlineButton::callback("Help", HELP_CALLBACK).with_url(help_url),
        InlineButton::callback("Another Joke", ANOTHER_JOKE_CALLBACK),
    ]])
}

/// Default reply keyboard. Labels match catalog labels so taps resolve to commands.
pub fn reply_keyboard() -> Keyboard {
    Keyboard::Reply(ReplyKeyboard {
        rows: vec![
            vec!["Start".to_string(), "Help".to_string()],
            vec!["Hello".to_string(), "Tell me a joke".to_string()],
        ],
        resizable: true,
    })
}
