// Skill gap engine: normalizer → detector → scorer/formatter.
// Pure and synchronous: no LLM calls, no store access.

pub mod detector;
pub mod gap;
pub mod graph;
pub mod handlers;
pub mod normalizer;
