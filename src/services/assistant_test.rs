use std::sync::Mutex;

use canvas::doc::{DocStore, Note};
use serde_json::json;

use super::*;
use crate::ai::{Completion, Tool, ToolCall};

// =========================================================================
// Mocks
// =========================================================================

#[derive(Default)]
struct MockCompletion {
    texts: Mutex<Vec<Result<String, AiError>>>,
    tool_turns: Mutex<Vec<Result<Completion, AiError>>>,
    prompts: Mutex<Vec<Vec<Message>>>,
}

impl MockCompletion {
    fn with_texts(texts: Vec<&str>) -> Self {
        let mock = Self::default();
        *mock.texts.lock().unwrap() = texts.into_iter().map(|t| Ok(t.to_owned())).collect();
        mock
    }

    fn push_tool_turn(&self, turn: Result<Completion, AiError>) {
        self.tool_turns.lock().unwrap().push(turn);
    }

    fn last_prompt(&self) -> Vec<Message> {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TextCompletionService for MockCompletion {
    async fn complete(&self, _max_tokens: u32, messages: &[Message]) -> Result<String, AiError> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        let mut texts = self.texts.lock().unwrap();
        if texts.is_empty() { Ok("done".into()) } else { texts.remove(0) }
    }

    async fn complete_with_tools(
        &self,
        _max_tokens: u32,
        messages: &[Message],
        _tools: &[Tool],
    ) -> Result<Completion, AiError> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        let mut turns = self.tool_turns.lock().unwrap();
        if turns.is_empty() { Ok(Completion::default()) } else { turns.remove(0) }
    }
}

struct MockSearch {
    query_vector: Result<Vec<f32>, ()>,
}

#[async_trait::async_trait]
impl VectorSearchService for MockSearch {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AiError> {
        match &self.query_vector {
            Ok(v) => Ok(texts.iter().map(|_| v.clone()).collect()),
            Err(()) => Err(AiError::Service { message: "offline".into(), retryable: true }),
        }
    }
}

fn assistant(mock: &Arc<MockCompletion>) -> Assistant {
    let completion: Arc<dyn TextCompletionService> = Arc::clone(mock) as Arc<dyn TextCompletionService>;
    Assistant::new(completion, BoardConfig::default())
}

fn board(contents: &[&str]) -> DocStore {
    let notes = contents
        .iter()
        .map(|c| Note::new(*c, "P1.txt", 0.0, 0.0, "#FFFFFF"))
        .collect();
    DocStore::from_parts(notes, vec![])
}

fn tool_turn(name: &str, input: serde_json::Value) -> Completion {
    Completion { text: None, tool_calls: vec![ToolCall { name: name.into(), input }] }
}

// =========================================================================
// find_notes
// =========================================================================

#[tokio::test]
async fn find_highlights_matches_and_clears_the_rest() {
    let mut store = board(&["too expensive", "love the UI", "pricing hurts"]);
    let ids: Vec<NoteId> = store.notes().iter().map(|n| n.id).collect();
    store.update_notes(&[NoteUpdate::new(
        ids[1],
        NotePatch { highlighted: Some(true), reasoning: Some(Some("old".into())), ..Default::default() },
    )]);
    let answer = json!({ "matches": [
        { "id": ids[0].to_string(), "reasoning": "price" },
        { "id": ids[2].to_string(), "reasoning": "price again" },
        { "id": "not-a-note", "reasoning": "?" }
    ]})
    .to_string();
    let mock = Arc::new(MockCompletion::with_texts(vec![answer.as_str()]));

    let reply = assistant(&mock).find_notes(&mut store, "pricing").await.unwrap();
    assert_eq!(reply, Reply::Highlighted { matched: 2, total: 3 });

    let notes = store.notes();
    assert!(notes[0].highlighted);
    assert_eq!(notes[0].reasoning.as_deref(), Some("price"));
    assert!(!notes[1].highlighted);
    assert_eq!(notes[1].reasoning, None);
    assert!(notes[2].highlighted);
}

#[tokio::test]
async fn find_with_no_matches_reports_none() {
    let mut store = board(&["a"]);
    let mock = Arc::new(MockCompletion::with_texts(vec![r#"{"matches": []}"#]));
    let reply = assistant(&mock).find_notes(&mut store, "x").await.unwrap();
    assert_eq!(reply.message(), "No matching notes found for that query.");
}

#[tokio::test]
async fn find_prefilters_by_embedding() {
    let mut store = board(&["close", "far"]);
    let ids: Vec<NoteId> = store.notes().iter().map(|n| n.id).collect();
    let mut notes = store.notes().to_vec();
    notes[0].embedding = Some(vec![1.0, 0.0]);
    notes[1].embedding = Some(vec![0.0, 1.0]);
    store.load_snapshot(notes, vec![]);

    let mock = Arc::new(MockCompletion::with_texts(vec![r#"{"matches": []}"#]));
    let search = Arc::new(MockSearch { query_vector: Ok(vec![1.0, 0.0]) });
    let assistant = assistant(&mock).with_search(search);
    assistant.find_notes(&mut store, "close").await.unwrap();

    let prompt = mock.last_prompt();
    let user = &prompt[1].content;
    assert!(user.contains(&ids[0].to_string()));
    assert!(!user.contains(&ids[1].to_string()));
}

#[tokio::test]
async fn find_falls_back_to_all_notes_when_embedding_fails() {
    let mut store = board(&["a", "b"]);
    let ids: Vec<NoteId> = store.notes().iter().map(|n| n.id).collect();
    let mut notes = store.notes().to_vec();
    notes[0].embedding = Some(vec![1.0]);
    store.load_snapshot(notes, vec![]);

    let mock = Arc::new(MockCompletion::with_texts(vec![r#"{"matches": []}"#]));
    let search = Arc::new(MockSearch { query_vector: Err(()) });
    assistant(&mock).with_search(search).find_notes(&mut store, "q").await.unwrap();

    let user = mock.last_prompt()[1].content.clone();
    assert!(user.contains(&ids[0].to_string()));
    assert!(user.contains(&ids[1].to_string()));
}

#[tokio::test]
async fn find_with_unparseable_answer_is_an_error() {
    let mut store = board(&["a"]);
    let mock = Arc::new(MockCompletion::with_texts(vec!["I'm not sure."]));
    let err = assistant(&mock).find_notes(&mut store, "q").await.unwrap_err();
    assert!(matches!(err, AiError::Parse(_)));
}

// =========================================================================
// chat turn
// =========================================================================

#[tokio::test]
async fn chat_tags_existing_notes_only() {
    let mut store = board(&["a", "b"]);
    let id = store.notes()[0].id;
    let mock = Arc::new(MockCompletion::default());
    mock.push_tool_turn(Ok(tool_turn(
        "tag_notes",
        json!({ "note_ids": [id.to_string(), Uuid::new_v4().to_string()], "tag": "pain" }),
    )));

    let replies = assistant(&mock).chat(&mut store, &[], "tag it").await.unwrap();
    assert_eq!(replies, vec![Reply::Tagged { tag: "pain".into(), count: 1 }]);
    assert!(store.notes()[0].tags.contains("pain"));
    assert!(store.notes()[1].tags.is_empty());
}

#[tokio::test]
async fn tagging_twice_keeps_one_tag() {
    let mut store = board(&["a"]);
    let id = store.notes()[0].id.to_string();
    let mock = Arc::new(MockCompletion::default());
    let a = assistant(&mock);
    for _ in 0..2 {
        a.execute(&mut store, ToolRequest::TagNotes { note_ids: vec![id.clone()], tag: "x".into() })
            .await
            .unwrap();
    }
    assert_eq!(store.notes()[0].tags.len(), 1);
}

#[tokio::test]
async fn chat_answer_question_returns_text() {
    let mut store = board(&["a"]);
    let mock = Arc::new(MockCompletion::default());
    mock.push_tool_turn(Ok(tool_turn("answer_question", json!({ "response": "Mostly pricing." }))));
    let replies = assistant(&mock).chat(&mut store, &[], "summary?").await.unwrap();
    assert_eq!(replies, vec![Reply::Text("Mostly pricing.".into())]);
}

#[tokio::test]
async fn chat_group_notes_proposes_themes_without_touching_board() {
    let mut store = board(&["a", "b"]);
    let before = store.clone();
    let mock = Arc::new(MockCompletion::with_texts(vec![
        r#"{"themes":[{"name":"Pricing","description":"cost"},{"name":"UI","description":"looks"}],"summary":"two"}"#,
    ]));
    mock.push_tool_turn(Ok(tool_turn("group_notes", json!({ "criteria": "topics" }))));

    let replies = assistant(&mock).chat(&mut store, &[], "group these").await.unwrap();
    let Reply::ThemesProposed(proposal) = &replies[0] else {
        panic!("expected a proposal, got {replies:?}");
    };
    assert_eq!(proposal.criteria, "topics");
    assert_eq!(proposal.themes.len(), 2);
    assert_eq!(proposal.summary.as_deref(), Some("two"));
    assert_eq!(store, before);
}

#[tokio::test]
async fn chat_unknown_tool_is_reported_not_fatal() {
    let mut store = board(&["a"]);
    let mock = Arc::new(MockCompletion::default());
    mock.push_tool_turn(Ok(Completion {
        text: None,
        tool_calls: vec![
            ToolCall { name: "drop_table".into(), input: json!({}) },
            ToolCall { name: "answer_question".into(), input: json!({ "response": "ok" }) },
        ],
    }));
    let replies = assistant(&mock).chat(&mut store, &[], "hi").await.unwrap();
    assert!(matches!(&replies[0], Reply::Failed { tool, .. } if tool == "drop_table"));
    assert_eq!(replies[1], Reply::Text("ok".into()));
}

#[tokio::test]
async fn chat_plain_text_is_passed_through() {
    let mut store = board(&[]);
    let mock = Arc::new(MockCompletion::default());
    mock.push_tool_turn(Ok(Completion { text: Some("Hello!".into()), tool_calls: vec![] }));
    let replies = assistant(&mock).chat(&mut store, &[], "hi").await.unwrap();
    assert_eq!(replies, vec![Reply::Text("Hello!".into())]);
}

#[tokio::test]
async fn chat_falls_back_to_direct_answer_when_tools_fail() {
    let mut store = board(&["a"]);
    let mock = Arc::new(MockCompletion::with_texts(vec!["fallback answer"]));
    mock.push_tool_turn(Err(AiError::Service { message: "no tools".into(), retryable: false }));
    let replies = assistant(&mock).chat(&mut store, &[], "why?").await.unwrap();
    assert_eq!(replies, vec![Reply::Text("fallback answer".into())]);
}

#[tokio::test]
async fn chat_sends_only_recent_history() {
    let mut store = board(&[]);
    let mock = Arc::new(MockCompletion::default());
    mock.push_tool_turn(Ok(Completion { text: Some("ok".into()), tool_calls: vec![] }));
    let history: Vec<Message> = (0..15).map(|i| Message::user(format!("m{i}"))).collect();

    assistant(&mock).chat(&mut store, &history, "latest").await.unwrap();
    let prompt = mock.last_prompt();
    // system + 10 history + the new message
    assert_eq!(prompt.len(), 12);
    assert_eq!(prompt[1].content, "m5");
    assert_eq!(prompt[11].content, "latest");
}
