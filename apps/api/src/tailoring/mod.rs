// Resume tailoring: prompt assembly → generation → response normalization.
// All LLM calls go through llm_client; raw failures are classified there.

pub mod handlers;
pub mod prompts;
pub mod schema;
