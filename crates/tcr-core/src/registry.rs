use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::{domain::ConnectionId, protocol::ServerEvent};

/// Per-session delivery queue drained by the socket adapter.
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Joined { display_name: String },
}

#[derive(Debug)]
pub struct Session {
    pub id: ConnectionId,
    pub state: SessionState,
    outbox: Outbox,
}

impl Session {
    pub fn display_name(&self) -> Option<&str> {
        match &self.state {
            SessionState::Joined { display_name } => Some(display_name),
            SessionState::Connected => None,
        }
    }

    pub fn is_joined(&self) -> bool {
        matches!(self.state, SessionState::Joined { .. })
    }

    /// Queue an event; false if the socket side is already gone.
    fn deliver(&self, event: ServerEvent) -> bool {
        self.outbox.send(event).is_ok()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined { num_users: usize },
    AlreadyJoined,
    UnknownSession,
}

/// Connected browser sessions plus the count of joined ones.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: u64,
    sessions: HashMap<ConnectionId, Session>,
    num_users: usize,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, outbox: Outbox) -> ConnectionId {
        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        self.sessions.insert(
            id,
            Session {
                id,
                state: SessionState::Connected,
                outbox,
            },
        );
        id
    }

    /// Transition a session to `Joined`. Only the first call per session counts.
    pub fn join(&mut self, id: ConnectionId, display_name: String) -> JoinOutcome {
        let Some(session) = self.sessions.get_mut(&id) else {
            return JoinOutcome::UnknownSession;
        };
        if session.is_joined() {
            return JoinOutcome::AlreadyJoined;
        }
        session.state = SessionState::Joined { display_name };
        self.num_users += 1;
        JoinOutcome::Joined {
            num_users: self.num_users,
        }
    }

    /// Drop a session, releasing its seat in `num_users` if it had joined.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Session> {
        let session = self.sessions.remove(&id)?;
        if session.is_joined() {
            self.num_users -= 1;
        }
        Some(session)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn num_users(&self) -> usize {
        self.num_users
    }

    /// Connected sessions, joined or not.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn send_to(&self, id: ConnectionId, event: ServerEvent) -> bool {
        self.sessions
            .get(&id)
            .map(|s| s.deliver(event))
            .unwrap_or(false)
    }

    /// Deliver to every session except `except`. Returns the number of sessions reached.
    pub fn broadcast(&self, event: &ServerEvent, except: Option<ConnectionId>) -> usize {
        self.sessions
            .values()
            .filter(|s| Some(s.id) != except)
            .filter(|s| s.deliver(event.clone()))
            .count()
    }
}
