// Conversational intake: collects applicant factors one slot per turn and
// hands the completed record to the CRS engine.
// All LLM calls go through llm_client via the interpreter.

pub mod handlers;
pub mod interpreter;
pub mod orchestrator;
pub mod prompts;
pub mod slots;
pub mod state;
pub mod store;
