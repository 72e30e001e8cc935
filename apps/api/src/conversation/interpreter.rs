//! Slot interpreter: the natural-language capability behind the orchestrator.
//!
//! The orchestrator only sees the `SlotInterpreter` trait. The default backend
//! is `LlmSlotInterpreter`; tests plug in scripted implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::conversation::prompts::{EXTRACTION_PROMPT_TEMPLATE, INTERPRETER_SYSTEM, OPENING_TURN};
use crate::conversation::slots::Slot;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_GUESSING_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::chat::ChatMessage;

/// Strict interpreter outcome: either a raw value for the slot or a reason to
/// ask again. There is no fallback path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Interpretation {
    Resolved {
        value: Value,
    },
    NeedsClarification {
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("interpreter call failed: {0}")]
    Llm(#[from] LlmError),
}

#[async_trait]
pub trait SlotInterpreter: Send + Sync {
    /// Interprets the latest user turn in `history` as an answer for `slot`.
    async fn interpret(
        &self,
        slot: Slot,
        history: &[ChatMessage],
    ) -> Result<Interpretation, InterpretError>;
}

pub struct LlmSlotInterpreter {
    llm: LlmClient,
    system: String,
}

impl LlmSlotInterpreter {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            system: format!("{INTERPRETER_SYSTEM} {JSON_ONLY_SYSTEM}"),
        }
    }
}

#[async_trait]
impl SlotInterpreter for LlmSlotInterpreter {
    async fn interpret(
        &self,
        slot: Slot,
        history: &[ChatMessage],
    ) -> Result<Interpretation, InterpretError> {
        let turns = build_turns(slot, history);
        Ok(self.llm.call_json(&self.system, &turns).await?)
    }
}

/// Opening turn + transcript + extraction instruction. The instruction is a
/// user turn, so the client merges it into the applicant's latest answer.
fn build_turns(slot: Slot, history: &[ChatMessage]) -> Vec<ChatMessage> {
    let instruction = EXTRACTION_PROMPT_TEMPLATE
        .replace("{slot}", slot.as_str())
        .replace("{question}", slot.question())
        .replace("{expected_shape}", slot.expected_shape())
        .replace("{no_guessing}", NO_GUESSING_INSTRUCTION);

    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(ChatMessage::user(OPENING_TURN));
    turns.extend(history.iter().cloned());
    turns.push(ChatMessage::user(instruction));
    turns
}
