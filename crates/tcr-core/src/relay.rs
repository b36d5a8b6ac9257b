use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    domain::{ChatId, ConnectionId},
    fabric::{ChatRoom, TypingState},
    history::ChatMessage,
    messaging::{
        port::MessagingPort,
        types::{format_outbound, IncomingText},
    },
    protocol::{ClientEvent, ServerEvent},
    registry::{JoinOutcome, Outbox},
    Result,
};

/// Process-wide relay context shared by both adapters.
///
/// Owns the chat room behind a single lock. Handlers never hold the lock
/// across an `.await`, so one slow Telegram send cannot stall other sessions.
pub struct Relay {
    group_id: ChatId,
    room: Mutex<ChatRoom>,
    channel: Arc<dyn MessagingPort>,
}

impl Relay {
    pub fn new(group_id: ChatId, channel: Arc<dyn MessagingPort>) -> Self {
        Self {
            group_id,
            room: Mutex::new(ChatRoom::new()),
            channel,
        }
    }

    pub fn group_id(&self) -> ChatId {
        self.group_id
    }

    // ============== Browser side ==============

    pub async fn connect(&self, outbox: Outbox) -> ConnectionId {
        let id = self.room.lock().await.connect(outbox);
        debug!(conn = %id, "session connected");
        id
    }

    /// Dispatch one decoded frame from a browser session.
    pub async fn handle_client_event(&self, id: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::AddUser(name) => self.add_user(id, name).await,
            ClientEvent::NewMessage(text) => {
                if let Err(e) = self.new_message(id, text).await {
                    warn!(conn = %id, error = %e, "rejected chat message");
                    self.room.lock().await.notify(
                        id,
                        ServerEvent::Error {
                            message: e.to_string(),
                        },
                    );
                }
            }
            ClientEvent::Typing => self.typing(id, TypingState::Started).await,
            ClientEvent::StopTyping => self.typing(id, TypingState::Stopped).await,
        }
    }

    pub async fn add_user(&self, id: ConnectionId, display_name: String) {
        let outcome = self.room.lock().await.add_user(id, display_name.clone());
        match outcome {
            JoinOutcome::Joined { num_users } => {
                info!(num_users, "{display_name} joined");
            }
            JoinOutcome::AlreadyJoined => {
                debug!(conn = %id, "ignoring repeated add user");
            }
            JoinOutcome::UnknownSession => {
                warn!(conn = %id, "add user from unknown session");
            }
        }
    }

    /// Relay a browser line to the other sessions, the history and the group.
    ///
    /// A failed Telegram send is logged and dropped; only a session that has
    /// not joined gets an error back.
    pub async fn new_message(&self, id: ConnectionId, text: String) -> Result<()> {
        let display_name = self.room.lock().await.post_message(id, &text)?;

        if let Err(e) = self.send_to_channel(&display_name, &text).await {
            warn!(error = %e, "failed to forward message to group");
        }
        info!("{display_name}: {text}");
        Ok(())
    }

    pub async fn typing(&self, id: ConnectionId, state: TypingState) {
        if !self.room.lock().await.typing(id, state) {
            debug!(conn = %id, ?state, "ignoring typing from session that has not joined");
        }
    }

    pub async fn disconnect(&self, id: ConnectionId) {
        let departure = self.room.lock().await.disconnect(id);
        match departure {
            Some(d) => info!(num_users = d.num_users, "{} left", d.display_name),
            None => debug!(conn = %id, "session closed before joining"),
        }
    }

    // ============== Channel side ==============

    /// Channel listener: relay in-scope group text into the chat room.
    ///
    /// Returns true when the message was relayed.
    pub async fn handle_channel_text(&self, msg: IncomingText) -> bool {
        let display_name = msg.member.display_name();

        if msg.chat_id != self.group_id {
            info!(
                chat_id = %msg.chat_id,
                username = msg.member.handle.as_deref().unwrap_or(""),
                chat_type = %msg.chat_kind,
                "Message outside scope >> {display_name}: {}",
                msg.text
            );
            return false;
        }

        let reached = self
            .room
            .lock()
            .await
            .relay_from_channel(&display_name, &msg.text);
        info!(sessions = reached, "{display_name}: {}", msg.text);
        true
    }

    /// Channel sender: post `"{display_name}: {text}"` to the configured group.
    pub async fn send_to_channel(&self, display_name: &str, text: &str) -> Result<()> {
        self.channel
            .send_text(self.group_id, &format_outbound(display_name, text))
            .await
    }

    // ============== Introspection ==============

    pub async fn num_users(&self) -> usize {
        self.room.lock().await.num_users()
    }

    pub async fn history(&self) -> Vec<ChatMessage> {
        self.room.lock().await.history().snapshot()
    }
}
