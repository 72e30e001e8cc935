// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that forbids guessing values the user did not state.
pub const NO_GUESSING_INSTRUCTION: &str = "\
    CRITICAL: Only report a value the user actually stated or that follows unambiguously \
    from what they said. Do NOT infer, assume defaults, or fill gaps. \
    If the answer is vague, contradictory, or missing, ask for clarification instead.";
