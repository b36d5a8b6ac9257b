//! Broadcast fabric: the chat room state and its synchronous event handlers.
//!
//! Every handler mutates the registry/history first and then queues the events
//! that report the mutation, so recipients never see a stale `numUsers`.
//! Nothing here awaits; callers hold one lock around each call.

use crate::{
    domain::ConnectionId,
    errors::Error,
    history::{ChatMessage, HistoryRing},
    protocol::ServerEvent,
    registry::{JoinOutcome, Outbox, SessionRegistry},
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingState {
    Started,
    Stopped,
}

/// Result of a disconnect for a session that had joined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Departure {
    pub display_name: String,
    pub num_users: usize,
}

#[derive(Debug, Default)]
pub struct ChatRoom {
    sessions: SessionRegistry,
    history: HistoryRing,
}

impl ChatRoom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: HistoryRing) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            history,
        }
    }

    pub fn connect(&mut self, outbox: Outbox) -> ConnectionId {
        self.sessions.connect(outbox)
    }

    /// Handle `add user`: login unicast to the joiner, then `user joined` to everyone else.
    pub fn add_user(&mut self, id: ConnectionId, display_name: String) -> JoinOutcome {
        let outcome = self.sessions.join(id, display_name.clone());
        if let JoinOutcome::Joined { num_users } = outcome {
            self.sessions.send_to(
                id,
                ServerEvent::Login {
                    num_users,
                    history: self.history.snapshot(),
                },
            );
            self.sessions.broadcast(
                &ServerEvent::UserJoined {
                    username: display_name,
                    num_users,
                },
                Some(id),
            );
        }
        outcome
    }

    /// Handle `new message` from a browser session.
    ///
    /// Returns the sender's display name so the caller can forward the line to
    /// the channel.
    pub fn post_message(&mut self, id: ConnectionId, text: &str) -> Result<String> {
        let session = self.sessions.get(id).ok_or(Error::UnknownSession(id))?;
        let display_name = session
            .display_name()
            .ok_or(Error::NotJoined(id))?
            .to_string();

        self.sessions.broadcast(
            &ServerEvent::NewMessage {
                username: display_name.clone(),
                message: text.to_string(),
            },
            Some(id),
        );
        self.history.push(ChatMessage::now(display_name.clone(), text));
        Ok(display_name)
    }

    /// Handle `typing` / `stop typing`. Sessions that have not joined are ignored.
    pub fn typing(&mut self, id: ConnectionId, state: TypingState) -> bool {
        let Some(username) = self
            .sessions
            .get(id)
            .and_then(|s| s.display_name())
            .map(str::to_string)
        else {
            return false;
        };
        let event = match state {
            TypingState::Started => ServerEvent::Typing { username },
            TypingState::Stopped => ServerEvent::StopTyping { username },
        };
        self.sessions.broadcast(&event, Some(id));
        true
    }

    /// Remove the session; announce `user left` only if it had joined.
    pub fn disconnect(&mut self, id: ConnectionId) -> Option<Departure> {
        let session = self.sessions.remove(id)?;
        let display_name = session.display_name()?.to_string();
        let num_users = self.sessions.num_users();
        self.sessions.broadcast(
            &ServerEvent::UserLeft {
                username: display_name.clone(),
                num_users,
            },
            None,
        );
        Some(Departure {
            display_name,
            num_users,
        })
    }

    /// A line from the group channel: record it and fan it out to every session.
    /// Returns the number of sessions reached.
    pub fn relay_from_channel(&mut self, display_name: &str, text: &str) -> usize {
        self.history.push(ChatMessage::now(display_name, text));
        self.sessions.broadcast(
            &ServerEvent::NewMessage {
                username: display_name.to_string(),
                message: text.to_string(),
            },
            None,
        )
    }

    /// Queue an event for a single session.
    pub fn notify(&self, id: ConnectionId, event: ServerEvent) -> bool {
        self.sessions.send_to(id, event)
    }

    pub fn num_users(&self) -> usize {
        self.sessions.num_users()
    }

    pub fn connected(&self) -> usize {
        self.sessions.len()
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }
}
