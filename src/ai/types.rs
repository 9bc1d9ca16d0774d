//! AI collaborator ports and provider-neutral message types.

use async_trait::async_trait;
use canvas::doc::{Note, NoteId};
use serde::{Deserialize, Serialize};

use super::search;
use crate::error::AiError;

// =============================================================================
// MESSAGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

// =============================================================================
// TOOLS
// =============================================================================

/// A tool definition offered to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// A tool invocation chosen by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub input: serde_json::Value,
}

/// Response from a tool-enabled completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

// =============================================================================
// PORTS
// =============================================================================

/// Text completion provider. Enables mocking in tests.
#[async_trait]
pub trait TextCompletionService: Send + Sync {
    /// Plain completion; the answer is the model's text.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Service`] if the provider call fails.
    async fn complete(&self, max_tokens: u32, messages: &[Message]) -> Result<String, AiError>;

    /// Completion where the model may answer with tool calls.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Service`] if the provider call fails.
    async fn complete_with_tools(
        &self,
        max_tokens: u32,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<Completion, AiError>;
}

/// A note scored against a query vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredNote {
    pub id: NoteId,
    pub score: f32,
}

/// Embedding provider plus similarity ranking.
#[async_trait]
pub trait VectorSearchService: Send + Sync {
    /// Embed each text. The result has one vector per input, in order.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Service`] if the provider call fails.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AiError>;

    /// Rank notes by cosine similarity to `query`, best first.
    fn rank(&self, query: &[f32], candidates: &[Note], limit: usize, min_score: f32) -> Vec<ScoredNote> {
        search::rank(query, candidates, limit, min_score)
    }
}
