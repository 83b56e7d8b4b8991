// Career memory: rolling aggregate over confirmed sessions, fed back into prompts.

pub mod aggregate;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod rebuild;
pub mod service;
