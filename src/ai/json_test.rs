use serde::Deserialize;

use super::*;

#[derive(Debug, Deserialize, PartialEq)]
struct Matches {
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Match {
    id: String,
    reasoning: String,
}

fn ids(m: &Matches) -> Vec<&str> {
    m.matches.iter().map(|m| m.id.as_str()).collect()
}

#[test]
fn plain_json() {
    let m: Matches = parse_model_json(r#"{"matches":[{"id":"a","reasoning":"r"}]}"#).unwrap();
    assert_eq!(ids(&m), vec!["a"]);
}

#[test]
fn fenced_json() {
    let text = "Here you go:\n```json\n{\"matches\": []}\n```\nanything else?";
    let m: Matches = parse_model_json(text).unwrap();
    assert!(m.matches.is_empty());
}

#[test]
fn trailing_commas_are_dropped() {
    let m: Matches = parse_model_json(r#"{"matches":[{"id":"a","reasoning":"r",},],}"#).unwrap();
    assert_eq!(ids(&m), vec!["a"]);
}

#[test]
fn commas_inside_strings_survive() {
    let m: Matches = parse_model_json(r#"{"matches":[{"id":"a","reasoning":"one, }two"}]}"#).unwrap();
    assert_eq!(m.matches[0].reasoning, "one, }two");
}

#[test]
fn prose_around_object() {
    let m: Matches = parse_model_json(r#"Sure! {"matches":[{"id":"b","reasoning":"r"}]} Hope that helps."#).unwrap();
    assert_eq!(ids(&m), vec!["b"]);
}

#[test]
fn truncated_output_keeps_complete_entries() {
    let text = r#"{"matches":[{"id":"a","reasoning":"r"},{"id":"b","reas"#;
    let m: Matches = parse_model_json(text).unwrap();
    assert_eq!(ids(&m), vec!["a"]);
}

#[test]
fn garbage_is_a_parse_error() {
    let err = parse_model_json::<Matches>("I could not find anything.").unwrap_err();
    assert!(matches!(err, AiError::Parse(_)));
}
