//! The dashboard's chat assistant.
//!
//! [`AssistantBridge`] forwards a message to a [`CompletionClient`] and, when
//! that fails for any reason, answers with one of five canned replies instead.
//! Callers always get a reply string. [`ChatSession`] keeps the transcript.

mod bridge;
mod chat;
mod client;

pub use bridge::{AssistantBridge, CANNED_REPLIES};
pub use chat::{ChatMessage, ChatSession, Sender};
pub use client::{AssistantError, CompletionClient, GeminiClient, GEMINI_ENDPOINT};
