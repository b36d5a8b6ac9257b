use std::sync::Arc;

use teloxide::{prelude::*, types::Chat};
use tracing::debug;

use tcr_core::{
    domain::{ChatId, UserId},
    messaging::types::{ChatKind, IncomingText, Member},
    relay::Relay,
};

pub async fn handle_text(msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    let Some(incoming) = incoming_text(&msg) else {
        debug!(chat_id = msg.chat.id.0, "text without sender, skipping");
        return Ok(());
    };

    relay.handle_channel_text(incoming).await;
    Ok(())
}

fn incoming_text(msg: &Message) -> Option<IncomingText> {
    let user = msg.from()?;
    let text = msg.text()?.to_string();

    Some(IncomingText {
        chat_id: ChatId(msg.chat.id.0),
        chat_kind: chat_kind(&msg.chat),
        member: Member {
            id: UserId(user.id.0 as i64),
            handle: user.username.clone(),
            first_name: Some(user.first_name.clone()),
            last_name: user.last_name.clone(),
        },
        text,
    })
}

fn chat_kind(chat: &Chat) -> ChatKind {
    if chat.is_private() {
        ChatKind::Private
    } else if chat.is_supergroup() {
        ChatKind::Supergroup
    } else if chat.is_channel() {
        ChatKind::Channel
    } else {
        ChatKind::Group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tcr_core::messaging::port::MessagingPort;

    struct NullMessenger;

    #[async_trait::async_trait]
    impl MessagingPort for NullMessenger {
        async fn send_text(&self, _chat_id: ChatId, _text: &str) -> tcr_core::Result<()> {
            Ok(())
        }
    }

    fn message(chat: Value, from: Option<Value>, text: &str) -> Message {
        let mut raw = json!({
            "message_id": 10,
            "date": 1_700_000_000,
            "chat": chat,
            "text": text,
        });
        if let Some(from) = from {
            raw["from"] = from;
        }
        serde_json::from_value(raw).unwrap()
    }

    fn supergroup(id: i64) -> Value {
        json!({ "id": id, "type": "supergroup", "title": "lobby" })
    }

    #[test]
    fn maps_sender_fields() {
        let msg = message(
            supergroup(-1001),
            Some(json!({
                "id": 42,
                "is_bot": false,
                "first_name": "Ada",
                "last_name": "Lovelace",
                "username": "ada"
            })),
            "hello",
        );

        let incoming = incoming_text(&msg).unwrap();
        assert_eq!(incoming.chat_id, ChatId(-1001));
        assert_eq!(incoming.chat_kind, ChatKind::Supergroup);
        assert_eq!(incoming.text, "hello");
        assert_eq!(incoming.member.id, UserId(42));
        assert_eq!(incoming.member.handle.as_deref(), Some("ada"));
        assert_eq!(incoming.member.first_name.as_deref(), Some("Ada"));
        assert_eq!(incoming.member.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(incoming.member.display_name(), "ada");
    }

    #[test]
    fn name_without_handle() {
        let msg = message(
            json!({ "id": -5, "type": "group", "title": "old group" }),
            Some(json!({ "id": 7, "is_bot": false, "first_name": "Grace" })),
            "hi",
        );

        let incoming = incoming_text(&msg).unwrap();
        assert_eq!(incoming.chat_kind, ChatKind::Group);
        assert_eq!(incoming.member.handle, None);
        assert_eq!(incoming.member.last_name, None);
        assert_eq!(incoming.member.display_name(), "Grace");
    }

    #[test]
    fn message_without_sender_is_skipped() {
        let msg = message(supergroup(-1001), None, "anonymous");
        assert!(incoming_text(&msg).is_none());
    }

    #[test]
    fn private_chat_kind() {
        let msg = message(
            json!({ "id": 7, "type": "private", "first_name": "Grace" }),
            Some(json!({ "id": 7, "is_bot": false, "first_name": "Grace" })),
            "dm",
        );
        assert_eq!(chat_kind(&msg.chat), ChatKind::Private);
    }

    #[tokio::test]
    async fn only_messages_with_sender_reach_history() {
        let relay = Arc::new(Relay::new(ChatId(-1001), Arc::new(NullMessenger)));

        handle_text(message(supergroup(-1001), None, "ghost"), relay.clone())
            .await
            .unwrap();
        assert!(relay.history().await.is_empty());

        let from = json!({ "id": 42, "is_bot": false, "first_name": "Ada", "username": "ada" });
        handle_text(message(supergroup(-1001), Some(from), "hello"), relay.clone())
            .await
            .unwrap();
        let history = relay.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].display_name, "ada");
        assert_eq!(history[0].text, "hello");
    }
}
