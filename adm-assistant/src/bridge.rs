use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

use crate::client::{CompletionClient, GeminiClient};

pub const CANNED_REPLIES: [&str; 5] = [
    "Your campaign performance shows a 12% increase in conversions compared to last week.",
    "I recommend focusing on mobile users as they show higher engagement rates.",
    "The seasonal campaign is performing exceptionally well with a ROAS of 3.2x.",
    "Your bounce rate has decreased by 5% since last month - great job!",
    "Consider increasing budget for the top performing campaigns.",
];

/// Turns a user message into a reply, falling back to a canned answer when
/// the completion client fails. One attempt per message.
#[derive(Clone)]
pub struct AssistantBridge {
    client: Arc<dyn CompletionClient>,
    rng: Arc<Mutex<StdRng>>,
}

impl AssistantBridge {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self::with_rng(client, StdRng::from_entropy())
    }

    pub fn with_rng(client: Arc<dyn CompletionClient>, rng: StdRng) -> Self {
        Self {
            client,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Bridge to the hosted assistant. Without a key every reply is canned.
    pub fn from_api_key(api_key: Option<String>) -> Self {
        Self::new(Arc::new(GeminiClient::new(api_key)))
    }

    pub async fn send(&self, text: &str) -> String {
        match self.client.complete(text).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("assistant unavailable ({}); using canned reply", e);
                self.canned_reply()
            }
        }
    }

    pub fn canned_reply(&self) -> String {
        let reply = match self.rng.lock() {
            Ok(mut rng) => CANNED_REPLIES.choose(&mut *rng).copied(),
            Err(_) => None,
        };
        reply.unwrap_or(CANNED_REPLIES[0]).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AssistantError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing {
        error: AssistantError,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionClient for Failing {
        async fn complete(&self, _prompt: &str) -> Result<String, AssistantError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(self.error.clone())
        }
    }

    struct Echo;

    #[async_trait]
    impl CompletionClient for Echo {
        async fn complete(&self, prompt: &str) -> Result<String, AssistantError> {
            Ok(format!("echo: {}", prompt))
        }
    }

    #[tokio::test]
    async fn test_no_credential_always_canned() {
        let bridge = AssistantBridge::with_rng(
            Arc::new(GeminiClient::new(None)),
            StdRng::seed_from_u64(3),
        );
        for _ in 0..20 {
            let reply = bridge.send("how are we doing?").await;
            assert!(!reply.is_empty());
            assert!(CANNED_REPLIES.contains(&reply.as_str()));
        }
    }

    #[tokio::test]
    async fn test_every_error_kind_falls_back_once() {
        for error in [
            AssistantError::MissingCredential,
            AssistantError::Transport("connection reset".to_string()),
            AssistantError::Status(503),
            AssistantError::EmptyCompletion,
        ] {
            let client = Arc::new(Failing {
                error,
                calls: AtomicUsize::new(0),
            });
            let bridge = AssistantBridge::with_rng(client.clone(), StdRng::seed_from_u64(4));
            let reply = bridge.send("hi").await;
            assert!(CANNED_REPLIES.contains(&reply.as_str()));
            assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_successful_completion_passes_through() {
        let bridge = AssistantBridge::new(Arc::new(Echo));
        assert_eq!(bridge.send("ROAS?").await, "echo: ROAS?");
    }
}
