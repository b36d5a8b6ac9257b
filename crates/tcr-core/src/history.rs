use std::collections::VecDeque;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Number of messages replayed to a browser session when it joins.
pub const HISTORY_CAPACITY: usize = 50;

/// One relayed chat line, regardless of which side it came from.
///
/// Field names on the wire follow the browser client (`username` / `message`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "username")]
    pub display_name: String,
    #[serde(rename = "message")]
    pub text: String,
}

impl ChatMessage {
    pub fn now(display_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            display_name: display_name.into(),
            text: text.into(),
        }
    }
}

/// Fixed-capacity FIFO of the most recent messages; oldest evicted first.
#[derive(Debug)]
pub struct HistoryRing {
    capacity: usize,
    entries: VecDeque<ChatMessage>,
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl HistoryRing {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a message, evicting the oldest one when full.
    /// Returns the evicted message, if any.
    pub fn push(&mut self, msg: ChatMessage) -> Option<ChatMessage> {
        if self.capacity == 0 {
            return Some(msg);
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(msg);
        evicted
    }

    /// Owned copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
