use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};
use tracing::{info, warn};
use url::Url;

use crate::dispatcher::Dispatcher;
use crate::platform::{display_name, InboundEvent, SendFailure, Transport};
use crate::reply::{InlineButton, Keyboard, OutboundReply};

/// Sends replies through the Telegram Bot API
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(&self, reply: &OutboundReply) -> Result<(), SendFailure> {
        let chat_id = parse_chat_id(&reply.chat_id)?;
        let request = self.bot.send_message(chat_id, reply.text.clone());
        let request = match render_keyboard(&reply.keyboard) {
            Some(markup) => request.reply_markup(markup),
            None => request,
        };
        request
            .await
            .map_err(|e| SendFailure::new(e.to_string()))?;
        Ok(())
    }
}

fn parse_chat_id(raw: &str) -> Result<ChatId, SendFailure> {
    raw.parse::<i64>()
        .map(ChatId)
        .map_err(|_| SendFailure::new(format!("Invalid chat id: {}", raw)))
}

fn render_keyboard(keyboard: &Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::None => None,
        Keyboard::Reply(reply) => {
            let rows: Vec<Vec<KeyboardButton>> = reply
                .rows
                .iter()
                .map(|row| row.iter().map(|label| KeyboardButton::new(label.as_str())).collect())
                .collect();
            let mut markup = KeyboardMarkup::new(rows);
            if reply.resizable {
                markup = markup.resize_keyboard();
            }
            Some(ReplyMarkup::Keyboard(markup))
        }
        Keyboard::Inline(rows) => {
            let rows: Vec<Vec<InlineKeyboardButton>> = rows
                .iter()
                .map(|row| row.iter().map(render_inline_button).collect())
                .collect();
            Some(ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows)))
        }
    }
}

/// Telegram buttons carry a single action: a URL wins over callback data.
fn render_inline_button(button: &InlineButton) -> InlineKeyboardButton {
    if let Some(raw) = &button.url {
        match raw.parse::<Url>() {
            Ok(url) => return InlineKeyboardButton::url(button.label.clone(), url),
            Err(e) => warn!("Invalid button url {}: {}", raw, e),
        }
    }
    InlineKeyboardButton::callback(button.label.clone(), button.callback_key.clone())
}

/// Run the Telegram bot platform
pub async fn run(bot: Bot, dispatcher: Arc<Dispatcher>) -> Result<()> {
    info!("Starting Telegram platform...");

    if let Err(e) = bot
        .set_my_commands(dispatcher.catalog().bot_commands())
        .await
    {
        warn!("Failed to register bot commands: {}", e);
    }

    let transport = Arc::new(TelegramTransport::new(bot.clone()));

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    teloxide::dispatching::Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher, transport])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

fn message_event(msg: &Message) -> Option<InboundEvent> {
    let user = msg.from.as_ref()?;
    let text = msg.text()?;
    Some(InboundEvent::Text {
        chat_id: msg.chat.id.0.to_string(),
        raw_text: text.to_string(),
        sender: display_name(&user.first_name, user.last_name.as_deref()),
    })
}

fn callback_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let data = query.data.as_ref()?;
    let message = query.message.as_ref()?;
    Some(InboundEvent::Callback {
        chat_id: message.chat().id.0.to_string(),
        callback_key: data.clone(),
        sender: display_name(&query.from.first_name, query.from.last_name.as_deref()),
    })
}

async fn handle_message(
    msg: Message,
    dispatcher: Arc<Dispatcher>,
    transport: Arc<TelegramTransport>,
) -> ResponseResult<()> {
    let Some(event) = message_event(&msg) else {
        return Ok(());
    };

    info!(
        "Telegram message from {} in chat {}: {:?}",
        event.sender(),
        event.chat_id(),
        msg.text()
    );
    dispatcher.on_event(&event, transport.as_ref()).await;
    Ok(())
}

async fn handle_callback(
    bot: Bot,
    query: CallbackQuery,
    dispatcher: Arc<Dispatcher>,
    transport: Arc<TelegramTransport>,
) -> ResponseResult<()> {
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!("Failed to answer callback query: {}", e);
    }

    let Some(event) = callback_event(&query) else {
        return Ok(());
    };

    info!(
        "Telegram callback in chat {}: {:?}",
        event.chat_id(),
        query.data
    );
    dispatcher.on_event(&event, transport.as_ref()).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::{inline_keyboard, reply_keyboard};
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_parse_chat_id() {
        assert_eq!(parse_chat_id("42").unwrap(), ChatId(42));
        assert_eq!(parse_chat_id("-1001234").unwrap(), ChatId(-1001234));
        assert!(parse_chat_id("not-a-chat").is_err());
    }

    #[test]
    fn test_no_keyboard_renders_nothing() {
        assert!(render_keyboard(&Keyboard::None).is_none());
    }

    #[test]
    fn test_reply_keyboard_renders_resizable() {
        let Some(ReplyMarkup::Keyboard(markup)) = render_keyboard(&reply_keyboard()) else {
            panic!("expected reply keyboard markup");
        };
        assert!(markup.resize_keyboard);
        assert_eq!(markup.keyboard.len(), 2);
        assert_eq!(markup.keyboard[0][0].text, "Start");
        assert_eq!(markup.keyboard[1][1].text, "Tell me a joke");
    }

    #[test]
    fn test_inline_keyboard_renders_buttons() {
        let keyboard = inline_keyboard("https://core.telegram.org/bots/features#commands");
        let Some(ReplyMarkup::InlineKeyboard(markup)) = render_keyboard(&keyboard) else {
            panic!("expected inline keyboard markup");
        };
        let row = &markup.inline_keyboard[0];
        assert_eq!(row.len(), 3);
        assert!(matches!(
            &row[0].kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "hello_callback"
        ));
        assert!(matches!(&row[1].kind, InlineKeyboardButtonKind::Url(_)));
        assert!(matches!(
            &row[2].kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "another_joke"
        ));
    }

    #[test]
    fn test_invalid_url_falls_back_to_callback() {
        let button = InlineButton::callback("Help", "help_callback").with_url("not a url");
        let rendered = render_inline_button(&button);
        assert!(matches!(
            rendered.kind,
            InlineKeyboardButtonKind::CallbackData(ref data) if data == "help_callback"
        ));
    }
}
