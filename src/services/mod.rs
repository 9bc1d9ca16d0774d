//! Application services built on the AI ports.

pub mod assistant;
pub mod classify;
pub mod prompts;
