use std::collections::HashMap;

use tracing::{debug, error, info};

use crate::catalog::{Catalog, COMMAND_DELIMITER};
use crate::platform::{InboundEvent, Transport};
use crate::random::{RandomSource, ThreadRandom};
use crate::reply::{
    inline_keyboard, reply_keyboard, OutboundReply, ANOTHER_JOKE_CALLBACK, HELLO_CALLBACK,
    HELP_CALLBACK,
};

pub const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 kinds of people in the world: those who understand binary and those who don't.",
    "A SQL query walks into a bar, goes up to two tables and asks: \"Can I join you?\"",
    "Why did the developer go broke? Because he used up all his cache.",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "I would tell you a UDP joke, but you might not get it.",
];

const NOTHING_TO_ECHO: &str = "Nothing to echo! You should write \"/echo text\"";
const UNKNOWN_COMMAND: &str = "Sorry, I don't understand that. Send /help or use the keyboard below.";
const UNKNOWN_ACTION: &str = "Unknown action!";

/// What a handler sees of the incoming event
struct Request<'a> {
    chat_id: &'a str,
    sender: &'a str,
    text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Start,
    StartWithReply,
    Hello,
    Joke,
    NameSurname,
    Help,
    ChatId,
    Echo,
}

impl Handler {
    fn handle(self, dispatcher: &Dispatcher, req: &Request<'_>) -> OutboundReply {
        match self {
            Handler::Start => OutboundReply::text(req.chat_id, greeting(req.sender))
                .with_keyboard(inline_keyboard(&dispatcher.help_url)),
            Handler::StartWithReply => {
                OutboundReply::text(req.chat_id, greeting(req.sender)).with_keyboard(reply_keyboard())
            }
            Handler::Hello => OutboundReply::text(req.chat_id, format!("Hello {} !", req.sender)),
            Handler::Joke => OutboundReply::text(req.chat_id, dispatcher.pick_joke())
                .with_keyboard(inline_keyboard(&dispatcher.help_url)),
            Handler::NameSurname => OutboundReply::text(req.chat_id, req.sender),
            Handler::Help => OutboundReply::text(req.chat_id, dispatcher.catalog.help_text())
                .with_keyboard(reply_keyboard()),
            Handler::ChatId => OutboundReply::text(req.chat_id, req.chat_id),
            Handler::Echo => OutboundReply::text(req.chat_id, echo_payload(req.text)),
        }
    }
}

fn greeting(sender: &str) -> String {
    format!(
        "Hello {} ! Welcome to the Telegram Bot. Send \"help\" to get available commands for this bot.",
        sender
    )
}

/// Everything after the leading command word, trimmed.
fn echo_payload(raw_text: &str) -> String {
    let remainder = raw_text
        .trim()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default();
    if remainder.is_empty() {
        NOTHING_TO_ECHO.to_string()
    } else {
        remainder.to_string()
    }
}

/// Routes inbound events to handlers and hands the replies to a transport.
/// Immutable after construction; share it behind an `Arc`.
pub struct Dispatcher {
    catalog: Catalog,
    text_handlers: HashMap<&'static str, Handler>,
    callback_handlers: HashMap<&'static str, Handler>,
    random: Box<dyn RandomSource>,
    help_url: String,
}

impl Dispatcher {
    pub fn new(help_url: impl Into<String>) -> Self {
        Self::with_random(help_url, ThreadRandom)
    }

    pub fn with_random(help_url: impl Into<String>, random: impl RandomSource + 'static) -> Self {
        let text_handlers = HashMap::from([
            ("/start", Handler::Start),
            ("/start_with_reply", Handler::StartWithReply),
            ("/hello", Handler::Hello),
            ("/joke", Handler::Joke),
            ("/name_surname", Handler::NameSurname),
            ("/help", Handler::Help),
            ("/chat_id", Handler::ChatId),
            ("/echo", Handler::Echo),
        ]);
        let callback_handlers = HashMap::from([
            (HELLO_CALLBACK, Handler::Hello),
            (HELP_CALLBACK, Handler::Help),
            (ANOTHER_JOKE_CALLBACK, Handler::Joke),
        ]);

        Self {
            catalog: Catalog::default(),
            text_handlers,
            callback_handlers,
            random: Box::new(random),
            help_url: help_url.into(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Maps free text to a handler key.
    ///
    /// A button label wins over everything else and yields its command token.
    /// Text starting with `/` yields its first word. Anything else is used whole.
    /// The key is always lower-cased.
    pub fn resolve_command_key(&self, raw_text: &str) -> String {
        let trimmed = raw_text.trim();
        if let Some(command) = self.catalog.resolve_by_label(trimmed) {
            return command.token.to_lowercase();
        }
        if trimmed.starts_with(COMMAND_DELIMITER) {
            let token = trimmed.split_whitespace().next().unwrap_or_default();
            return match self.catalog.resolve(token) {
                Some(command) => command.token.to_lowercase(),
                None => token.to_lowercase(),
            };
        }
        trimmed.to_lowercase()
    }

    /// Builds the reply for one event. Never fails.
    pub fn handle(&self, event: &InboundEvent) -> OutboundReply {
        match event {
            InboundEvent::Text {
                chat_id,
                raw_text,
                sender,
            } => {
                let key = self.resolve_command_key(raw_text);
                debug!("Resolved text from chat {} to key {}", chat_id, key);
                let req = Request {
                    chat_id,
                    sender,
                    text: raw_text,
                };
                match self.text_handlers.get(key.as_str()) {
                    Some(handler) => handler.handle(self, &req),
                    None => self.unknown_command(&req),
                }
            }
            InboundEvent::Callback {
                chat_id,
                callback_key,
                sender,
            } => {
                let req = Request {
                    chat_id,
                    sender,
                    text: "",
                };
                match self.callback_handlers.get(callback_key.as_str()) {
                    Some(handler) => handler.handle(self, &req),
                    None => {
                        info!("Received unknown callback: {}", callback_key);
                        OutboundReply::text(chat_id, UNKNOWN_ACTION)
                    }
                }
            }
        }
    }

    /// Handles one event end to end. Delivery failures are logged, not returned.
    pub async fn on_event(&self, event: &InboundEvent, transport: &dyn Transport) {
        let reply = self.handle(event);
        self.send(&reply, transport).await;
    }

    pub async fn send(&self, reply: &OutboundReply, transport: &dyn Transport) {
        if let Err(e) = transport.send(reply).await {
            error!(
                "Failed to send message to chatId: {} with error: {}",
                reply.chat_id, e.message
            );
        }
    }

    fn unknown_command(&self, req: &Request<'_>) -> OutboundReply {
        info!("Received unknown command: {}", req.text);
        OutboundReply::text(req.chat_id, UNKNOWN_COMMAND).with_keyboard(reply_keyboard())
    }

    fn pick_joke(&self) -> &'static str {
        JOKES[self.random.next_index(JOKES.len())]
    }
}
