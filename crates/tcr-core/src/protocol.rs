//! JSON frames exchanged with browser sessions over the socket.
//!
//! Every frame is `{"event": <name>, "data": <payload>}`; event names keep the
//! spaces the browser client uses (`"add user"`, `"new message"`, ...).

use serde::{Deserialize, Serialize};

use crate::history::ChatMessage;

/// Browser session → relay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "add user")]
    AddUser(String),
    #[serde(rename = "new message")]
    NewMessage(String),
    #[serde(rename = "typing")]
    Typing,
    #[serde(rename = "stop typing")]
    StopTyping,
}

/// Relay → browser session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Unicast once to a session that just joined.
    #[serde(rename = "login")]
    Login {
        #[serde(rename = "numUsers")]
        num_users: usize,
        history: Vec<ChatMessage>,
    },
    #[serde(rename = "new message")]
    NewMessage { username: String, message: String },
    #[serde(rename = "user joined")]
    UserJoined {
        username: String,
        #[serde(rename = "numUsers")]
        num_users: usize,
    },
    #[serde(rename = "user left")]
    UserLeft {
        username: String,
        #[serde(rename = "numUsers")]
        num_users: usize,
    },
    #[serde(rename = "typing")]
    Typing { username: String },
    #[serde(rename = "stop typing")]
    StopTyping { username: String },
    /// A request from this session was rejected.
    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerEvent {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_client_frames() {
        let add: ClientEvent =
            serde_json::from_value(json!({ "event": "add user", "data": "alice" })).unwrap();
        assert_eq!(add, ClientEvent::AddUser("alice".into()));

        let msg: ClientEvent =
            serde_json::from_value(json!({ "event": "new message", "data": "hi" })).unwrap();
        assert_eq!(msg, ClientEvent::NewMessage("hi".into()));

        let typing: ClientEvent = serde_json::from_value(json!({ "event": "typing" })).unwrap();
        assert_eq!(typing, ClientEvent::Typing);

        let stop: ClientEvent =
            serde_json::from_value(json!({ "event": "stop typing" })).unwrap();
        assert_eq!(stop, ClientEvent::StopTyping);
    }

    #[test]
    fn rejects_unknown_client_frames() {
        assert!(serde_json::from_value::<ClientEvent>(json!({ "event": "kick", "data": 1 })).is_err());
        assert!(serde_json::from_value::<ClientEvent>(json!({ "event": "add user" })).is_err());
    }

    #[test]
    fn server_frames_use_client_field_names() {
        let login = ServerEvent::Login {
            num_users: 2,
            history: vec![ChatMessage {
                timestamp: 1,
                display_name: "bob".into(),
                text: "yo".into(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&login).unwrap(),
            json!({
                "event": "login",
                "data": {
                    "numUsers": 2,
                    "history": [{ "timestamp": 1, "username": "bob", "message": "yo" }]
                }
            })
        );

        let left = ServerEvent::UserLeft {
            username: "bob".into(),
            num_users: 1,
        };
        assert_eq!(
            serde_json::to_value(&left).unwrap(),
            json!({ "event": "user left", "data": { "username": "bob", "numUsers": 1 } })
        );

        let typing = ServerEvent::StopTyping {
            username: "amy".into(),
        };
        assert_eq!(
            typing.to_json().unwrap(),
            r#"{"event":"stop typing","data":{"username":"amy"}}"#
        );
    }
}
