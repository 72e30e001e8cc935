// Prompt constants for the conversation interpreter and the fixed
// user-facing replies of the orchestrator.

/// System prompt for slot interpretation. `llm_client::prompts::JSON_ONLY_SYSTEM`
/// is appended at call time.
pub const INTERPRETER_SYSTEM: &str =
    "You are an intake assistant for a Canadian Express Entry points calculator. \
    You read a conversation between the assistant and an applicant and extract the \
    applicant's answer to the most recent question as a structured value.";

/// Synthetic opening turn so the transcript starts with the applicant.
pub const OPENING_TURN: &str = "I'd like to estimate my Comprehensive Ranking System score.";

/// Extraction instruction appended after the transcript.
/// Replace `{slot}`, `{question}`, `{expected_shape}` and `{no_guessing}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the applicant's answer for the field "{slot}".

The question asked was: "{question}"

The value must be {expected_shape}.

Language test conversions, when the applicant gives a band score instead of a CLB level:
- IELTS General: listening 8.5+ = CLB10, 8.0 = 9, 7.5 = 8, 6.0-7.0 = 7, 5.5 = 6, 5.0 = 5, 4.5 = 4; reading 8.0+ = 10, 7.0 = 9, 6.5 = 8, 6.0 = 7, 5.0-5.5 = 6, 4.0-4.5 = 5, 3.5 = 4; writing and speaking 7.5+ = 10, 7.0 = 9, 6.5 = 8, 6.0 = 7, 5.5 = 6, 5.0 = 5, 4.0-4.5 = 4.
- CELPIP-General: the level equals the CLB level (M = 0).
- TEF Canada / TCF Canada results are NCLC levels; report the NCLC level directly.

{no_guessing}

Return a JSON object with this EXACT schema (no extra fields), either:
{"status": "resolved", "value": <the value>}
or, when the answer is vague, contradictory, or does not answer the question:
{"status": "needs_clarification", "reason": "<one short sentence telling the applicant what is missing>"}"#;

/// Prefix used when the interpreter is unavailable, times out, or returns garbage.
pub const RETRY_MESSAGE: &str =
    "Sorry, I couldn't process that answer just now. Could you rephrase it?";
