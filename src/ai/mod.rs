//! AI collaborator ports, the research tool registry and model-output decoding.
//!
//! DESIGN
//! ======
//! The board never talks to a provider directly. Services receive
//! `Arc<dyn TextCompletionService>` / `Arc<dyn VectorSearchService>`, so a
//! provider adapter, or a canned mock in tests, can be swapped in freely.

pub mod json;
pub mod search;
pub mod tools;
pub mod types;

pub use json::parse_model_json;
pub use types::{
    Completion, Message, Role, ScoredNote, TextCompletionService, Tool, ToolCall, VectorSearchService,
};
