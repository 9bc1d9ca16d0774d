use std::sync::Mutex;

use canvas::doc::{BoardStore, Note};
use canvas::palette::{cluster_color, note_color};
use serde_json::json;

use super::*;
use crate::ai::{Completion, Message, Tool};
use crate::error::ErrorCode;

fn workspace(contents: &[&str]) -> Workspace {
    let mut ws = Workspace::default();
    for content in contents {
        ws.add_note(Note::new(*content, "P1.txt", 0.0, 0.0, "#FFFFFF"));
    }
    ws
}

fn item(id: NoteId, reasoning: &str) -> ClassifiedItem {
    ClassifiedItem { id: id.to_string(), reasoning: reasoning.into() }
}

// =========================================================================
// analysis_tab_name
// =========================================================================

#[test]
fn short_query_is_the_tab_name() {
    assert_eq!(analysis_tab_name("pricing pain"), "pricing pain");
}

#[test]
fn long_query_is_cut_to_thirty_chars() {
    let query = "what do participants say about onboarding friction";
    let name = analysis_tab_name(query);
    assert_eq!(name, format!("{}...", &query[..30]));
}

#[test]
fn exactly_thirty_chars_is_kept() {
    let query = "a".repeat(30);
    assert_eq!(analysis_tab_name(&query), query);
}

// =========================================================================
// apply_classification
// =========================================================================

#[test]
fn classification_builds_a_new_active_tab() {
    let mut ws = workspace(&["expensive", "slow", "pretty", "other"]);
    let source = ws.active_id();
    let ids: Vec<NoteId> = ws.notes().iter().map(|n| n.id).collect();
    let result = ClassificationResult {
        clusters: vec![
            ClassifiedCluster {
                name: "Cost".into(),
                reasoning: "money".into(),
                items: vec![item(ids[0], "price")],
            },
            ClassifiedCluster {
                name: "Speed".into(),
                reasoning: "latency".into(),
                items: vec![item(ids[1], "slow"), item(ids[2], "meh")],
            },
        ],
        unclustered: vec![item(ids[3], "off topic")],
    };

    let tab = apply_classification(&mut ws, "why do people churn", &result);

    assert_eq!(ws.active_id(), tab);
    assert_eq!(ws.tabs().len(), 2);
    let active = ws.active_tab();
    assert_eq!(active.name, "why do people churn");
    assert_eq!(active.query.as_deref(), Some("why do people churn"));

    let clusters = ws.clusters();
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].name, "Cost");
    assert_eq!(clusters[0].color, cluster_color(0));
    assert_eq!(clusters[1].color, cluster_color(1));
    assert_eq!(clusters[1].reasoning, "latency");

    let cost = ws.note(&ids[0]).unwrap();
    assert_eq!(cost.cluster_id, Some(clusters[0].id));
    assert_eq!(cost.color, note_color(0));
    assert_eq!(cost.reasoning.as_deref(), Some("price"));

    let meh = ws.note(&ids[2]).unwrap();
    assert_eq!(meh.cluster_id, Some(clusters[1].id));
    assert_eq!(meh.color, note_color(1));

    let other = ws.note(&ids[3]).unwrap();
    assert_eq!(other.cluster_id, None);
    assert_eq!(other.reasoning.as_deref(), Some("off topic"));

    // Source tab untouched.
    let original = &ws.tab(&source).unwrap().board;
    assert!(original.clusters().is_empty());
    assert!(original.notes().iter().all(|n| n.reasoning.is_none() && n.color == "#FFFFFF"));
}

#[test]
fn classification_lays_notes_out_by_cluster() {
    let mut ws = workspace(&["a", "b", "c"]);
    let ids: Vec<NoteId> = ws.notes().iter().map(|n| n.id).collect();
    let result = ClassificationResult {
        clusters: vec![ClassifiedCluster {
            name: "One".into(),
            reasoning: String::new(),
            items: vec![item(ids[0], ""), item(ids[2], "")],
        }],
        unclustered: vec![item(ids[1], "")],
    };
    apply_classification(&mut ws, "q", &result);

    let order: Vec<_> = ws.clusters().iter().map(|c| c.id).collect();
    let expected = arrange_in_clusters(ws.notes(), &order);
    for (note, placement) in ws.notes().iter().zip(expected) {
        assert_eq!(note.id, placement.id);
        assert_eq!((note.x, note.y), (placement.x, placement.y));
    }
}

#[test]
fn unknown_and_malformed_ids_are_skipped() {
    let mut ws = workspace(&["a"]);
    let id = ws.notes()[0].id;
    let result = ClassificationResult {
        clusters: vec![ClassifiedCluster {
            name: "Only".into(),
            reasoning: String::new(),
            items: vec![
                ClassifiedItem { id: "note-7".into(), reasoning: String::new() },
                item(Uuid::new_v4(), ""),
                item(id, "real"),
            ],
        }],
        unclustered: vec![],
    };
    apply_classification(&mut ws, "q", &result);

    assert_eq!(ws.notes().len(), 1);
    assert_eq!(ws.notes()[0].reasoning.as_deref(), Some("real"));
}

#[test]
fn previous_memberships_are_dropped() {
    let mut ws = workspace(&["a", "b"]);
    let ids: Vec<NoteId> = ws.notes().iter().map(|n| n.id).collect();
    let old = Cluster::new("Old", "#000000", "");
    let old_id = old.id;
    ws.add_cluster(old);
    ws.update_notes(&[canvas::doc::NoteUpdate::new(
        ids[1],
        canvas::doc::NotePatch { cluster_id: Some(Some(old_id)), ..Default::default() },
    )]);

    let result = ClassificationResult {
        clusters: vec![ClassifiedCluster {
            name: "New".into(),
            reasoning: String::new(),
            items: vec![item(ids[0], "")],
        }],
        unclustered: vec![],
    };
    apply_classification(&mut ws, "q", &result);

    assert_eq!(ws.clusters().len(), 1);
    assert_eq!(ws.note(&ids[1]).unwrap().cluster_id, None);
}

// =========================================================================
// classify_with_themes
// =========================================================================

struct CannedCompletion {
    reply: String,
    seen: Mutex<Vec<Message>>,
}

#[async_trait::async_trait]
impl TextCompletionService for CannedCompletion {
    async fn complete(&self, _max_tokens: u32, messages: &[Message]) -> Result<String, AiError> {
        *self.seen.lock().unwrap() = messages.to_vec();
        Ok(self.reply.clone())
    }

    async fn complete_with_tools(
        &self,
        _max_tokens: u32,
        _messages: &[Message],
        _tools: &[Tool],
    ) -> Result<Completion, AiError> {
        Ok(Completion::default())
    }
}

#[tokio::test]
async fn classify_with_themes_decodes_fenced_answer() {
    let ws = workspace(&["a"]);
    let id = ws.notes()[0].id;
    let body = json!({
        "clusters": [{ "name": "Cost", "reasoning": "money", "items": [{ "id": id.to_string(), "reasoning": "r" }] }],
        "unclustered": []
    });
    let canned = Arc::new(CannedCompletion { reply: format!("```json\n{body}\n```"), seen: Mutex::default() });
    let completion: Arc<dyn TextCompletionService> = Arc::clone(&canned) as Arc<dyn TextCompletionService>;
    let themes = vec![Theme { name: "Cost".into(), description: "money talk".into() }];

    let result = classify_with_themes(&completion, 1024, ws.notes(), &themes, "churn").await.unwrap();
    assert_eq!(result.clusters.len(), 1);
    assert_eq!(result.clusters[0].items[0].note_id(), Some(id));

    let seen = canned.seen.lock().unwrap();
    assert!(seen[1].content.contains("\"Cost\": money talk"));
}

#[tokio::test]
async fn classify_with_themes_rejects_prose() {
    let ws = workspace(&["a"]);
    let completion: Arc<dyn TextCompletionService> =
        Arc::new(CannedCompletion { reply: "Sorry, I can't.".into(), seen: Mutex::default() });
    let err = classify_with_themes(&completion, 1024, ws.notes(), &[], "q").await.unwrap_err();
    assert_eq!(err.error_code(), "E_AI_PARSE");
}
