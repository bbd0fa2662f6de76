use adm_utils::dates::clock_label;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::bridge::AssistantBridge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub text: String,
    pub sender: Sender,
    /// "HH:MM"
    pub time_label: String,
}

/// Chat transcript plus the "assistant is typing" flag.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    waiting: bool,
    last_id: i64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Record a user message and mark the session as waiting. Returns `None`
    /// for blank input, which is ignored.
    pub fn begin(&mut self, text: &str, now: DateTime<Local>) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        self.record(text.to_string(), Sender::User, now);
        self.waiting = true;
        Some(text.to_string())
    }

    /// Record the bot reply and clear the waiting flag.
    pub fn finish(&mut self, reply: String, now: DateTime<Local>) -> &ChatMessage {
        self.waiting = false;
        self.record(reply, Sender::Bot, now)
    }

    /// Send `text` through `bridge`, recording both sides of the exchange.
    /// Returns the bot reply, or `None` if the input was blank.
    pub async fn send_message(&mut self, bridge: &AssistantBridge, text: &str) -> Option<String> {
        let prompt = self.begin(text, Local::now())?;
        let reply = bridge.send(&prompt).await;
        Some(self.finish(reply, Local::now()).text.clone())
    }

    fn record(&mut self, text: String, sender: Sender, now: DateTime<Local>) -> &ChatMessage {
        let id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        self.messages.push(ChatMessage {
            id,
            text,
            sender,
            time_label: clock_label(&now),
        });
        &self.messages[self.messages.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::CANNED_REPLIES;
    use crate::client::GeminiClient;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn offline_bridge() -> AssistantBridge {
        AssistantBridge::with_rng(Arc::new(GeminiClient::new(None)), StdRng::seed_from_u64(8))
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut session = ChatSession::new();
        assert_eq!(session.send_message(&offline_bridge(), "   \n").await, None);
        assert!(session.messages().is_empty());
        assert!(!session.is_waiting());
    }

    #[tokio::test]
    async fn test_one_bot_reply_per_send() {
        let bridge = offline_bridge();
        let mut session = ChatSession::new();
        let reply = session.send_message(&bridge, "How is mobile doing?").await.unwrap();
        assert!(CANNED_REPLIES.contains(&reply.as_str()));

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "How is mobile doing?");
        assert_eq!(messages[1].sender, Sender::Bot);
        assert_eq!(messages[1].text, reply);
        assert!(messages[0].id < messages[1].id);
        assert!(!session.is_waiting());

        session.send_message(&bridge, "And desktop?").await.unwrap();
        assert_eq!(session.messages().len(), 4);
    }

    #[test]
    fn test_waiting_between_begin_and_finish() {
        let mut session = ChatSession::new();
        let now = Local::now();
        assert_eq!(session.begin("hi", now).as_deref(), Some("hi"));
        assert!(session.is_waiting());
        let bot = session.finish("hello".to_string(), now);
        assert_eq!(bot.time_label, clock_label(&now));
        assert!(!session.is_waiting());
    }

    #[test]
    fn test_message_json_shape() {
        let msg = ChatMessage {
            id: 1,
            text: "hi".to_string(),
            sender: Sender::Bot,
            time_label: "09:05".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "bot");
        assert_eq!(json["timeLabel"], "09:05");
    }
}
