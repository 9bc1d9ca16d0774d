//! Prompt builders for the research assistant.

use std::fmt::Write;

use canvas::doc::{Cluster, Note};

use super::assistant::Theme;
use crate::ai::Message;

/// Boards larger than this are summarized by a sample in the system prompt.
const MAX_INLINE_NOTES: usize = 50;
const SAMPLE_NOTES: usize = 20;

fn note_line(out: &mut String, note: &Note) {
    let _ = writeln!(out, "(ID: {}) \"{}\"", note.id, note.content);
}

fn note_list(notes: &[Note]) -> String {
    let mut out = String::new();
    for note in notes {
        note_line(&mut out, note);
    }
    out
}

/// System prompt for the tool-choosing chat turn.
#[must_use]
pub fn tool_chat_system_prompt(notes: &[Note], clusters: &[Cluster]) -> String {
    let mut prompt = String::from(
        "You are an expert UX research assistant helping a researcher analyze qualitative data on a visual \
         canvas of sticky notes.\n\nResearch data:\n",
    );

    if notes.is_empty() {
        prompt.push_str("(empty board, no notes yet)\n");
    } else if notes.len() <= MAX_INLINE_NOTES {
        prompt.push_str(&note_list(notes));
    } else {
        prompt.push_str(&format!("Total: {} notes. Here is a sample of {SAMPLE_NOTES}:\n", notes.len()));
        prompt.push_str(&note_list(&notes[..SAMPLE_NOTES]));
        prompt.push_str(&format!("... and {} more notes.\n", notes.len() - SAMPLE_NOTES));
    }

    if !clusters.is_empty() {
        prompt.push_str("\nCurrent clusters:\n");
        for cluster in clusters {
            prompt.push_str(&format!("- {}: {}\n", cluster.name, cluster.reasoning));
        }
    }

    let highlighted: Vec<&Note> = notes.iter().filter(|n| n.highlighted).collect();
    if highlighted.is_empty() {
        prompt.push_str("\nNo notes are currently highlighted.\n");
    } else {
        prompt.push_str(&format!("\nCurrently highlighted notes ({} of {}):\n", highlighted.len(), notes.len()));
        for note in highlighted {
            note_line(&mut prompt, note);
        }
    }

    let selected: Vec<&Note> = notes.iter().filter(|n| n.selected).collect();
    if selected.is_empty() {
        prompt.push_str("\nNo notes are currently selected.\n");
    } else {
        prompt.push_str(&format!("\nCurrently selected notes ({} of {}):\n", selected.len(), notes.len()));
        for note in selected {
            note_line(&mut prompt, note);
        }
    }

    prompt.push_str(
        "\nYou MUST use the provided tools to respond:\n\
         - To SEE, FIND or FILTER notes, use find_notes (highlights matches on the canvas).\n\
         - To GROUP, ORGANIZE or CATEGORIZE, use group_notes.\n\
         - For an analytical QUESTION needing a written answer, use answer_question.\n\
         - To TAG or LABEL notes, use tag_notes.\n\
         Prefer find_notes over answer_question when the researcher is exploring data.",
    );
    prompt
}

/// Ask the model to confirm which candidates match `query`.
#[must_use]
pub fn find_prompt(candidates: &[Note], query: &str, total: usize) -> Vec<Message> {
    vec![
        Message::system(format!(
            "You are helping a UX researcher find specific notes. You are given {} candidate notes (from {total} \
             total). Confirm which ones truly match the search query; be inclusive. For each match, explain why.\n\n\
             Respond ONLY with valid JSON (no markdown fences). Format:\n\
             {{\"matches\": [{{\"id\": \"note-id\", \"reasoning\": \"Why this matches\"}}]}}",
            candidates.len()
        )),
        Message::user(format!("Find notes matching: \"{query}\"\n\nCandidate notes:\n{}", note_list(candidates))),
    ]
}

/// Ask the model to propose themes for human review.
#[must_use]
pub fn theme_proposal_prompt(notes: &[Note], criteria: &str) -> Vec<Message> {
    let items: String = notes
        .iter()
        .enumerate()
        .map(|(i, n)| format!("[{i}] \"{}\"\n", n.content))
        .collect();
    vec![
        Message::system(
            "You are an expert qualitative researcher. PROPOSE themes for these sticky notes but do NOT classify \
             them yet; the researcher will review the themes first. Aim for 3-7 meaningful themes, each with a \
             name and description.\n\n\
             Respond ONLY with valid JSON (no markdown fences). Format:\n\
             {\"themes\": [{\"name\": \"Theme Name\", \"description\": \"What this theme captures\"}], \
             \"summary\": \"One or two sentences on what you found\"}",
        ),
        Message::user(format!("Query: \"{criteria}\"\n\nSticky notes to analyze:\n{items}")),
    ]
}

/// Ask the model to classify every note into approved themes.
#[must_use]
pub fn classify_prompt(notes: &[Note], themes: &[Theme], query: &str) -> Vec<Message> {
    let themes_list: String = themes
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. \"{}\": {}\n", i + 1, t.name, t.description))
        .collect();
    vec![
        Message::system(
            "You are an expert qualitative researcher. Classify each sticky note into one of the approved themes, \
             or mark it unclustered. Give specific reasoning for every classification.\n\n\
             Respond ONLY with valid JSON (no markdown fences). Format:\n\
             {\"clusters\": [{\"name\": \"Exact Theme Name\", \"reasoning\": \"What the theme represents\", \
             \"items\": [{\"id\": \"note-id\", \"reasoning\": \"Why it belongs\"}]}], \
             \"unclustered\": [{\"id\": \"note-id\", \"reasoning\": \"Why it fits no theme\"}]}",
        ),
        Message::user(format!(
            "Original query: \"{query}\"\n\nApproved themes:\n{themes_list}\nSticky notes to classify:\n{}",
            note_list(notes)
        )),
    ]
}

/// Answer a question from the most relevant notes.
#[must_use]
pub fn answer_prompt(
    relevant: &[Note],
    total: usize,
    clusters: &[Cluster],
    history: &[Message],
    question: &str,
) -> Vec<Message> {
    let mut context = String::new();
    for note in relevant {
        let _ = write!(context, "- \"{}\" (source: {}", note.content, note.source);
        if let Some(participant) = &note.participant_id {
            let _ = write!(context, ", participant: {participant}");
        }
        context.push_str(")\n");
    }
    if !clusters.is_empty() {
        context.push_str("\nCurrent clusters:\n");
        for cluster in clusters {
            let _ = writeln!(context, "- {}: {}", cluster.name, cluster.reasoning);
        }
    }

    let mut messages = vec![Message::system(format!(
        "You are an expert UX research assistant. The researcher has {total} notes total. Here are the most \
         relevant notes for their question:\n\n{context}\nAnswer concisely and insightfully. Reference specific \
         data points. Speak like a fellow researcher."
    ))];
    messages.extend_from_slice(history);
    messages.push(Message::user(question));
    messages
}

#[cfg(test)]
#[path = "prompts_test.rs"]
mod tests;
