//! Research-assistant tool definitions and their typed inputs.

use serde::Deserialize;
use serde_json::json;

use super::types::{Tool, ToolCall};
use crate::error::AiError;

pub const FIND_NOTES: &str = "find_notes";
pub const GROUP_NOTES: &str = "group_notes";
pub const ANSWER_QUESTION: &str = "answer_question";
pub const TAG_NOTES: &str = "tag_notes";

/// Build the set of tools offered to the research assistant.
#[must_use]
pub fn research_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: FIND_NOTES.into(),
            description: "Search and visually highlight notes on the canvas that match a query. Use this when the \
                          researcher wants to see, find, filter or locate specific notes. Matching notes are \
                          highlighted and the rest are dimmed."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "An expanded search query, broadened with synonyms of the researcher's intent."
                    }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: GROUP_NOTES.into(),
            description: "Organize all notes into thematic groups. Proposes themes for the researcher to review \
                          before anything is classified."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "criteria": { "type": "string", "description": "The dimension to organize by, e.g. \"user sentiment\"." }
                },
                "required": ["criteria"]
            }),
        },
        Tool {
            name: ANSWER_QUESTION.into(),
            description: "Provide a written answer to an analytical question (summaries, counts, comparisons). \
                          Do not use this when the researcher wants to see specific notes."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "response": { "type": "string", "description": "The answer, referencing specific notes." }
                },
                "required": ["response"]
            }),
        },
        Tool {
            name: TAG_NOTES.into(),
            description: "Add a tag to specific notes.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "note_ids": { "type": "array", "items": { "type": "string" }, "description": "Note IDs to tag." },
                    "tag": { "type": "string", "description": "The tag to apply." }
                },
                "required": ["note_ids", "tag"]
            }),
        },
    ]
}

/// A tool call with its input decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    FindNotes { query: String },
    GroupNotes { criteria: String },
    AnswerQuestion { response: String },
    TagNotes { note_ids: Vec<String>, tag: String },
}

#[derive(Deserialize)]
struct QueryInput {
    query: String,
}

#[derive(Deserialize)]
struct CriteriaInput {
    criteria: String,
}

#[derive(Deserialize)]
struct ResponseInput {
    response: String,
}

#[derive(Deserialize)]
struct TagInput {
    note_ids: Vec<String>,
    tag: String,
}

impl ToolRequest {
    /// Decode a model tool call.
    ///
    /// # Errors
    ///
    /// [`AiError::UnknownTool`] for names outside the registry,
    /// [`AiError::ToolInput`] when the arguments don't match the schema.
    pub fn from_call(call: &ToolCall) -> Result<Self, AiError> {
        let input = call.input.clone();
        match call.name.as_str() {
            FIND_NOTES => decode::<QueryInput>(FIND_NOTES, input).map(|i| Self::FindNotes { query: i.query }),
            GROUP_NOTES => {
                decode::<CriteriaInput>(GROUP_NOTES, input).map(|i| Self::GroupNotes { criteria: i.criteria })
            }
            ANSWER_QUESTION => decode::<ResponseInput>(ANSWER_QUESTION, input)
                .map(|i| Self::AnswerQuestion { response: i.response }),
            TAG_NOTES => {
                decode::<TagInput>(TAG_NOTES, input).map(|i| Self::TagNotes { note_ids: i.note_ids, tag: i.tag })
            }
            other => Err(AiError::UnknownTool(other.to_owned())),
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(tool: &'static str, input: serde_json::Value) -> Result<T, AiError> {
    serde_json::from_value(input).map_err(|e| AiError::ToolInput { tool, message: e.to_string() })
}

#[cfg(test)]
#[path = "tools_test.rs"]
mod tests;
