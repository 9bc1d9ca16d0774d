//! Turns approved themes into clusters on a new analysis tab.
//!
//! DESIGN
//! ======
//! The researcher approves a theme list, the model sorts every note into
//! those themes, and [`apply_classification`] turns the answer into a fresh
//! tab: one cluster per theme, members recolored and laid out in cluster
//! blocks. The source tab is left untouched.

use std::sync::Arc;

use canvas::doc::{BoardStore, Cluster, Note, NoteId};
use canvas::layout::arrange_in_clusters;
use canvas::palette::{cluster_color, note_color};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::assistant::Theme;
use super::prompts::classify_prompt;
use crate::ai::{TextCompletionService, parse_model_json};
use crate::error::AiError;
use crate::workspace::{TabId, Workspace};

/// Longest query kept verbatim in an analysis tab name.
const TAB_NAME_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassificationResult {
    #[serde(default)]
    pub clusters: Vec<ClassifiedCluster>,
    #[serde(default)]
    pub unclustered: Vec<ClassifiedItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassifiedCluster {
    pub name: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub items: Vec<ClassifiedItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassifiedItem {
    pub id: String,
    #[serde(default)]
    pub reasoning: String,
}

impl ClassifiedItem {
    fn note_id(&self) -> Option<NoteId> {
        Uuid::parse_str(self.id.trim()).ok()
    }
}

/// Ask the model to sort `notes` into the approved `themes`.
///
/// # Errors
///
/// Propagates service failures; [`AiError::Parse`] if the answer isn't a
/// classification.
pub async fn classify_with_themes(
    completion: &Arc<dyn TextCompletionService>,
    max_tokens: u32,
    notes: &[Note],
    themes: &[Theme],
    query: &str,
) -> Result<ClassificationResult, AiError> {
    let raw = completion
        .complete(max_tokens, &classify_prompt(notes, themes, query))
        .await?;
    let result: ClassificationResult = parse_model_json(&raw)?;
    info!(clusters = result.clusters.len(), unclustered = result.unclustered.len(), "classification received");
    Ok(result)
}

/// Name for an analysis tab: the query, cut to 30 characters plus `...`.
#[must_use]
pub fn analysis_tab_name(query: &str) -> String {
    if query.chars().count() > TAB_NAME_MAX_CHARS {
        let head: String = query.chars().take(TAB_NAME_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        query.to_owned()
    }
}

/// Build an analysis tab from the active tab's notes and an approved classification.
///
/// Clusters get palette colors by their position; members get the cluster's
/// reasoning, cluster id and the note palette color of that position.
/// Unclustered notes lose any membership and keep the stated reasoning.
/// Unknown or malformed note ids are skipped. The new tab becomes active.
pub fn apply_classification(ws: &mut Workspace, query: &str, result: &ClassificationResult) -> TabId {
    let mut notes: Vec<Note> = ws.notes().to_vec();
    for note in &mut notes {
        note.cluster_id = None;
    }

    let mut clusters = Vec::with_capacity(result.clusters.len());
    let mut skipped = 0usize;
    for (index, classified) in result.clusters.iter().enumerate() {
        let cluster = Cluster::new(&classified.name, cluster_color(index), &classified.reasoning);
        for item in &classified.items {
            let Some(note) = item.note_id().and_then(|id| notes.iter_mut().find(|n| n.id == id)) else {
                skipped += 1;
                continue;
            };
            note.cluster_id = Some(cluster.id);
            note.reasoning = Some(item.reasoning.clone());
            note_color(index).clone_into(&mut note.color);
        }
        clusters.push(cluster);
    }
    for item in &result.unclustered {
        let Some(note) = item.note_id().and_then(|id| notes.iter_mut().find(|n| n.id == id)) else {
            skipped += 1;
            continue;
        };
        note.cluster_id = None;
        note.reasoning = Some(item.reasoning.clone());
    }
    if skipped > 0 {
        warn!(skipped, "classification referenced unknown notes");
    }

    let order: Vec<_> = clusters.iter().map(|c| c.id).collect();
    let placements = arrange_in_clusters(&notes, &order);
    for (note, placement) in notes.iter_mut().zip(placements) {
        note.x = placement.x;
        note.y = placement.y;
    }

    let id = ws.create_analysis_tab(analysis_tab_name(query), query, notes, clusters);
    info!(tab = %id, clusters = order.len(), "classification applied");
    id
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
