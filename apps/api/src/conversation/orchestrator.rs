//! Dialogue Orchestrator: drives one conversation turn at a time.
//!
//! Flow per user message: append message → interpret against the current slot
//! (under a timeout) → record value or re-ask → score exactly once when the
//! record is complete.
//!
//! Recoverable failures (vague answers, interpreter errors, timeouts) become a
//! question for the same slot. Only internal errors reach the caller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::conversation::interpreter::{Interpretation, SlotInterpreter};
use crate::conversation::prompts::RETRY_MESSAGE;
use crate::conversation::slots::Slot;
use crate::conversation::state::{CompletedAssessment, ConversationState, Phase};
use crate::crs::score_applicant;
use crate::errors::AppError;
use crate::models::chat::ChatMessage;
use crate::models::score::ScoreBreakdown;

/// Why a question is being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AskKind {
    /// First time this slot is asked.
    Next,
    /// The answer was vague or out of range.
    Clarify,
    /// The interpreter failed or timed out.
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Ask {
        slot: Slot,
        kind: AskKind,
        question: String,
    },
    Complete {
        breakdown: ScoreBreakdown,
        closing_message: String,
    },
}

/// Wire form of a turn.
#[derive(Debug, Clone, Serialize)]
pub struct AdvanceResponse {
    pub conversation_id: Uuid,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<AskKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_message: Option<String>,
}

impl AdvanceResponse {
    pub fn from_turn(conversation_id: Uuid, turn: Turn) -> Self {
        match turn {
            Turn::Ask {
                slot,
                kind,
                question,
            } => Self {
                conversation_id,
                complete: false,
                next_question: Some(question),
                slot: Some(slot),
                kind: Some(kind),
                final_score: None,
                breakdown: None,
                closing_message: None,
            },
            Turn::Complete {
                breakdown,
                closing_message,
            } => Self {
                conversation_id,
                complete: true,
                next_question: None,
                slot: None,
                kind: None,
                final_score: Some(breakdown.total_score),
                breakdown: Some(breakdown),
                closing_message: Some(closing_message),
            },
        }
    }
}

pub struct Orchestrator {
    interpreter: Arc<dyn SlotInterpreter>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(interpreter: Arc<dyn SlotInterpreter>, timeout: Duration) -> Self {
        Self {
            interpreter,
            timeout,
        }
    }

    /// Asks the opening question of a fresh conversation.
    pub fn start(&self, state: &mut ConversationState) -> Result<Turn, AppError> {
        match state.phase() {
            Phase::Collecting(slot) if state.history().is_empty() => {
                Ok(ask(state, slot, AskKind::Next, slot.question().to_string()))
            }
            _ => Err(AppError::Conflict(format!(
                "Conversation {} has already started",
                state.id()
            ))),
        }
    }

    /// Processes one user message and returns the next turn.
    pub async fn advance(
        &self,
        state: &mut ConversationState,
        user_message: &str,
    ) -> Result<Turn, AppError> {
        let slot = match state.phase() {
            Phase::Collecting(slot) => slot,
            Phase::Complete => {
                return Err(AppError::Conflict(format!(
                    "Conversation {} is complete; start a new conversation to recalculate",
                    state.id()
                )))
            }
        };

        let content = user_message.trim();
        if content.is_empty() {
            return Err(AppError::Validation(
                "Message content must not be empty".to_string(),
            ));
        }
        state.push_message(ChatMessage::user(content));

        let interpretation =
            tokio::time::timeout(self.timeout, self.interpreter.interpret(slot, state.history()))
                .await;

        let value = match interpretation {
            Err(_) => {
                warn!(
                    "Interpreter timed out after {:?} on slot {} (conversation {})",
                    self.timeout,
                    slot.as_str(),
                    state.id()
                );
                return Ok(retry(state, slot));
            }
            Ok(Err(e)) => {
                warn!(
                    "Interpreter failed on slot {} (conversation {}): {e}",
                    slot.as_str(),
                    state.id()
                );
                return Ok(retry(state, slot));
            }
            Ok(Ok(Interpretation::NeedsClarification { reason })) => {
                debug!("Slot {} needs clarification: {reason}", slot.as_str());
                return Ok(clarify(state, slot, &reason));
            }
            Ok(Ok(Interpretation::Resolved { value })) => value,
        };

        let parsed = match slot.parse(&value) {
            Ok(parsed) => parsed,
            Err(reason) => {
                debug!(
                    "Slot {} rejected interpreter value {value}: {reason}",
                    slot.as_str()
                );
                return Ok(clarify(state, slot, &reason));
            }
        };

        let next = state
            .record(parsed)
            .map_err(|e| AppError::Internal(anyhow!(e)))?;
        info!(
            "Conversation {}: resolved {} ({} slots filled)",
            state.id(),
            slot.as_str(),
            state.draft().resolved_count()
        );

        match next {
            Some(next) => Ok(ask(state, next, AskKind::Next, next.question().to_string())),
            None => finish(state),
        }
    }
}

fn ask(state: &mut ConversationState, slot: Slot, kind: AskKind, question: String) -> Turn {
    state.push_message(ChatMessage::assistant(question.clone()));
    Turn::Ask {
        slot,
        kind,
        question,
    }
}

fn clarify(state: &mut ConversationState, slot: Slot, reason: &str) -> Turn {
    let question = format!("{} {}", reason.trim(), slot.question());
    ask(state, slot, AskKind::Clarify, question)
}

fn retry(state: &mut ConversationState, slot: Slot) -> Turn {
    let question = format!("{RETRY_MESSAGE} {}", slot.question());
    ask(state, slot, AskKind::Retry, question)
}

/// Scores the completed record. Runs once per conversation: the state moves
/// to `Complete` and further turns are rejected.
fn finish(state: &mut ConversationState) -> Result<Turn, AppError> {
    let factors = state.draft().to_factors().ok_or_else(|| {
        AppError::Internal(anyhow!(
            "Conversation {} has no unresolved slot but an incomplete record",
            state.id()
        ))
    })?;

    let breakdown = score_applicant(&factors)?;
    let closing_message = closing_message(&breakdown);

    info!(
        "Conversation {} complete: CRS {}/{}",
        state.id(),
        breakdown.total_score,
        breakdown.ceiling
    );

    state.push_message(ChatMessage::assistant(closing_message.clone()));
    state.complete(CompletedAssessment { factors, breakdown });

    Ok(Turn::Complete {
        breakdown,
        closing_message,
    })
}

fn closing_message(breakdown: &ScoreBreakdown) -> String {
    let mut message = format!(
        "Thanks, that's everything I need. Your estimated CRS score is {} (maximum {}). \
         Core human capital: {}, spouse factors: {}, skill transferability: {}, \
         additional points: {}.",
        breakdown.total_score,
        breakdown.ceiling,
        breakdown.core.subtotal,
        breakdown.spouse.subtotal,
        breakdown.skill_transferability.subtotal,
        breakdown.additional.subtotal,
    );
    if breakdown.additional.provincial_nomination > 0 {
        message.push_str(
            " Your provincial nomination adds 600 points, which places you well above recent draw cut-offs.",
        );
    }
    message
}
