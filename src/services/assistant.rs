//! Research assistant: one chat turn, its tool calls and the board updates they make.
//!
//! DESIGN
//! ======
//! A chat turn sends the board summary and the researcher's message to the
//! completion service with the research tools. Each returned tool call is
//! executed against the board:
//!
//! - `find_notes` pre-filters by embedding similarity when notes carry
//!   embeddings, asks the model to confirm matches, then highlights the
//!   matches and clears the rest in one batch.
//! - `tag_notes` adds a tag to each listed note that exists.
//! - `group_notes` asks for a theme proposal; nothing changes on the board
//!   until the researcher approves it (see `classify`).
//! - `answer_question` returns the model's text.
//!
//! A failing tool does not abort the turn; it is reported as a
//! [`Reply::Failed`] alongside the others.

use std::sync::Arc;

use canvas::doc::{BoardStore, Note, NoteId, NotePatch, NoteUpdate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::prompts::{answer_prompt, find_prompt, theme_proposal_prompt, tool_chat_system_prompt};
use crate::ai::tools::{ToolRequest, research_tools};
use crate::ai::{Message, TextCompletionService, VectorSearchService, parse_model_json};
use crate::config::BoardConfig;
use crate::error::AiError;

/// Chat history sent with each turn.
const HISTORY_TURNS: usize = 10;

/// Relevant notes included when answering a question.
const ANSWER_CONTEXT_NOTES: usize = 30;

// =============================================================================
// TYPES
// =============================================================================

/// A theme proposed for researcher review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeProposal {
    #[serde(default)]
    pub criteria: String,
    pub themes: Vec<Theme>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// What one tool call (or a plain answer) produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Highlighted { matched: usize, total: usize },
    Tagged { tag: String, count: usize },
    ThemesProposed(ThemeProposal),
    Failed { tool: String, message: String },
}

impl Reply {
    /// Chat message shown to the researcher.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Highlighted { matched: 0, .. } => "No matching notes found for that query.".into(),
            Self::Highlighted { matched, total } => {
                format!("Highlighted {matched} of {total} notes on the canvas. The rest are dimmed.")
            }
            Self::Tagged { tag, count } => format!("Tagged {count} notes with \"{tag}\"."),
            Self::ThemesProposed(p) => format!("Proposed {} themes for review.", p.themes.len()),
            Self::Failed { tool, message } => format!("Error in {tool}: {message}"),
        }
    }
}

#[derive(Deserialize)]
struct FindResponse {
    #[serde(default)]
    matches: Vec<FindMatch>,
}

#[derive(Deserialize)]
struct FindMatch {
    id: String,
    #[serde(default)]
    reasoning: String,
}

// =============================================================================
// ASSISTANT
// =============================================================================

pub struct Assistant {
    completion: Arc<dyn TextCompletionService>,
    search: Option<Arc<dyn VectorSearchService>>,
    config: BoardConfig,
}

impl Assistant {
    #[must_use]
    pub fn new(completion: Arc<dyn TextCompletionService>, config: BoardConfig) -> Self {
        Self { completion, search: None, config }
    }

    /// Enable the semantic pre-filter for `find_notes` and answers.
    #[must_use]
    pub fn with_search(mut self, search: Arc<dyn VectorSearchService>) -> Self {
        self.search = Some(search);
        self
    }

    /// Run one chat turn.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tool-choosing completion fails and the
    /// direct-answer fallback fails too.
    pub async fn chat<S: BoardStore>(
        &self,
        store: &mut S,
        history: &[Message],
        message: &str,
    ) -> Result<Vec<Reply>, AiError> {
        info!(message_len = message.len(), notes = store.notes().len(), "assistant: turn started");
        let recent = &history[history.len().saturating_sub(HISTORY_TURNS)..];
        let mut messages = vec![Message::system(tool_chat_system_prompt(store.notes(), store.clusters()))];
        messages.extend_from_slice(recent);
        messages.push(Message::user(message));

        let completion = match self
            .completion
            .complete_with_tools(self.config.ai_max_tokens, &messages, &research_tools())
            .await
        {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "assistant: tool call failed; answering directly");
                return Ok(vec![self.answer(store, recent, message).await?]);
            }
        };

        if completion.tool_calls.is_empty() {
            return match completion.text {
                Some(text) if !text.trim().is_empty() => Ok(vec![Reply::Text(text)]),
                _ => Ok(vec![self.answer(store, recent, message).await?]),
            };
        }

        let mut replies = Vec::with_capacity(completion.tool_calls.len());
        for call in &completion.tool_calls {
            info!(tool = %call.name, "assistant: executing tool");
            let result = match ToolRequest::from_call(call) {
                Ok(request) => self.execute(store, request).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(reply) => replies.push(reply),
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "assistant: tool error");
                    replies.push(Reply::Failed { tool: call.name.clone(), message: e.to_string() });
                }
            }
        }
        Ok(replies)
    }

    /// Execute one decoded tool request against the board.
    ///
    /// # Errors
    ///
    /// Propagates completion failures and unparseable model output.
    pub async fn execute<S: BoardStore>(&self, store: &mut S, request: ToolRequest) -> Result<Reply, AiError> {
        match request {
            ToolRequest::FindNotes { query } => self.find_notes(store, &query).await,
            ToolRequest::GroupNotes { criteria } => self.propose_themes(store.notes(), &criteria).await,
            ToolRequest::AnswerQuestion { response } => Ok(Reply::Text(response)),
            ToolRequest::TagNotes { note_ids, tag } => Ok(tag_notes(store, &note_ids, &tag)),
        }
    }

    /// Highlight the notes matching `query` and clear every other highlight.
    ///
    /// # Errors
    ///
    /// Propagates completion failures and unparseable model output.
    pub async fn find_notes<S: BoardStore>(&self, store: &mut S, query: &str) -> Result<Reply, AiError> {
        let notes = store.notes().to_vec();
        let candidates = self.candidates(&notes, query, self.config.find_candidates).await;

        let raw = self
            .completion
            .complete(self.config.ai_max_tokens, &find_prompt(&candidates, query, notes.len()))
            .await?;
        let response: FindResponse = parse_model_json(&raw)?;

        let matches: Vec<(NoteId, String)> = response
            .matches
            .into_iter()
            .filter_map(|m| Some((parse_id(&m.id)?, m.reasoning)))
            .collect();
        let updates: Vec<NoteUpdate> = notes
            .iter()
            .map(|note| {
                let reasoning = matches.iter().find(|(id, _)| *id == note.id).map(|(_, r)| r.clone());
                let patch = NotePatch {
                    highlighted: Some(reasoning.is_some()),
                    reasoning: Some(reasoning),
                    ..Default::default()
                };
                NoteUpdate::new(note.id, patch)
            })
            .collect();
        let matched = updates
            .iter()
            .filter(|u| u.patch.highlighted == Some(true))
            .count();
        store.update_notes(&updates);

        info!(query, matched, total = notes.len(), "assistant: notes found");
        Ok(Reply::Highlighted { matched, total: notes.len() })
    }

    /// Ask for a theme proposal over `notes`.
    ///
    /// # Errors
    ///
    /// Propagates completion failures and unparseable model output.
    pub async fn propose_themes(&self, notes: &[Note], criteria: &str) -> Result<Reply, AiError> {
        let raw = self
            .completion
            .complete(self.config.ai_max_tokens, &theme_proposal_prompt(notes, criteria))
            .await?;
        let mut proposal: ThemeProposal = parse_model_json(&raw)?;
        criteria.clone_into(&mut proposal.criteria);
        info!(criteria, themes = proposal.themes.len(), "assistant: themes proposed");
        Ok(Reply::ThemesProposed(proposal))
    }

    /// Answer `question` from the most relevant notes.
    ///
    /// # Errors
    ///
    /// Propagates completion failures.
    pub async fn answer<S: BoardStore>(&self, store: &S, history: &[Message], question: &str) -> Result<Reply, AiError> {
        let notes = store.notes();
        let relevant = self.candidates(notes, question, ANSWER_CONTEXT_NOTES).await;
        let messages = answer_prompt(&relevant, notes.len(), store.clusters(), history, question);
        let text = self
            .completion
            .complete(self.config.ai_max_tokens, &messages)
            .await?;
        Ok(Reply::Text(text))
    }

    /// Semantic pre-filter. Falls back to every note when there are no
    /// embeddings, no search service, no hits, or the embed call fails.
    async fn candidates(&self, notes: &[Note], query: &str, limit: usize) -> Vec<Note> {
        let Some(search) = &self.search else {
            return notes.to_vec();
        };
        if !notes.iter().any(|n| n.embedding.as_ref().is_some_and(|e| !e.is_empty())) {
            return notes.to_vec();
        }
        let query_vec = match search.embed(&[query.to_owned()]).await {
            Ok(mut vectors) if !vectors.is_empty() => vectors.swap_remove(0),
            Ok(_) => return notes.to_vec(),
            Err(e) => {
                warn!(error = %e, "assistant: embedding failed; searching all notes");
                return notes.to_vec();
            }
        };
        let ranked = search.rank(&query_vec, notes, limit, self.config.find_min_similarity);
        if ranked.is_empty() {
            return notes.to_vec();
        }
        ranked
            .iter()
            .filter_map(|s| notes.iter().find(|n| n.id == s.id).cloned())
            .collect()
    }
}

/// Add `tag` to each listed note that exists. Returns how many were tagged.
fn tag_notes<S: BoardStore>(store: &mut S, note_ids: &[String], tag: &str) -> Reply {
    let updates: Vec<NoteUpdate> = note_ids
        .iter()
        .filter_map(|raw| parse_id(raw))
        .filter(|id| store.note(id).is_some())
        .map(|id| NoteUpdate::new(id, NotePatch { add_tags: vec![tag.to_owned()], ..Default::default() }))
        .collect();
    let count = store.update_notes(&updates);
    info!(tag, count, "assistant: notes tagged");
    Reply::Tagged { tag: tag.to_owned(), count }
}

fn parse_id(raw: &str) -> Option<NoteId> {
    Uuid::parse_str(raw.trim()).ok()
}

#[cfg(test)]
#[path = "assistant_test.rs"]
mod tests;
