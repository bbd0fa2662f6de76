use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How many events the feed retains.
pub const HISTORY_LEN: usize = 3;

/// The messages a tick can emit.
pub const MESSAGE_CATALOG: [&str; 5] = [
    "New conversion detected on Summer Sale campaign!",
    "Mobile traffic increased by 8% this hour",
    "Retargeting campaign reached its daily budget",
    "Goal milestone reached: 1000 conversions today",
    "New user segment created: High-value customers",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    /// Milliseconds since the Unix epoch, bumped if needed so ids strictly increase.
    pub id: i64,
    pub message: String,
    /// "HH:MM" at emission.
    pub timestamp_label: String,
}

/// Ring of the most recent [`HISTORY_LEN`] notifications, oldest first.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    events: VecDeque<NotificationEvent>,
    last_id: i64,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event built from `message`, dropping the oldest beyond the
    /// retention limit.
    pub fn push(&mut self, message: &str, now_millis: i64, timestamp_label: String) -> &NotificationEvent {
        let id = now_millis.max(self.last_id + 1);
        self.last_id = id;
        if self.events.len() == HISTORY_LEN {
            self.events.pop_front();
        }
        self.events.push_back(NotificationEvent {
            id,
            message: message.to_string(),
            timestamp_label,
        });
        &self.events[self.events.len() - 1]
    }

    pub fn events(&self) -> impl Iterator<Item = &NotificationEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Pick one catalog message uniformly.
pub fn pick_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    MESSAGE_CATALOG.choose(rng).copied().unwrap_or(MESSAGE_CATALOG[0])
}
