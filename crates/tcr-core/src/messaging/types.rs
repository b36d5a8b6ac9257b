use std::fmt;

use crate::domain::{ChatId, UserId};

/// Channel-agnostic inbound text event.
///
/// Telegram-specific fields should live in the Telegram adapter.
#[derive(Clone, Debug)]
pub struct IncomingText {
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
    pub member: Member,
    pub text: String,
}

/// Sender of an inbound message.
#[derive(Clone, Debug)]
pub struct Member {
    pub id: UserId,
    pub handle: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Member {
    /// Name shown in the chatroom: handle, else "first last", else the numeric id.
    pub fn display_name(&self) -> String {
        if let Some(handle) = self.handle.as_deref().filter(|h| !h.is_empty()) {
            return handle.to_string();
        }
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        self.id.0.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChatKind::Private => "private",
            ChatKind::Group => "group",
            ChatKind::Supergroup => "supergroup",
            ChatKind::Channel => "channel",
        })
    }
}

/// Line posted to the group on behalf of a browser user.
pub fn format_outbound(display_name: &str, text: &str) -> String {
    format!("{display_name}: {text}")
}
