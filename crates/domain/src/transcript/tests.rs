use proptest::prelude::*;
use serde_json::{Value, json};

use super::{SpeakerRole, TranscriptExtractor, TranscriptOptions};
use crate::audit::AuditLog;
use crate::ticket::UserDirectory;

fn chat(history: Value) -> Value {
    json!({"type": "ChatStartedEvent", "value": {"history": history}})
}

fn message(actor_type: &str, text: &str) -> Value {
    json!({"type": "ChatMessage", "actor_type": actor_type, "message": text})
}

fn extract(log: Value) -> super::Transcript {
    TranscriptExtractor::default().extract(&AuditLog::from_json(&log), &UserDirectory::new())
}

#[test]
fn maps_roles_and_preserves_chat_order_across_audits() {
    let transcript = extract(json!({"audits": [
        {"events": [chat(json!([
            message("end-user", "My order is late"),
            message("agent", "Let me check"),
        ]))]},
        {"events": [chat(json!([message("end-user", "Thanks")]))]}
    ]}));

    assert_eq!(
        transcript.render(),
        "CLIENT (User): My order is late\nAGENT (User): Let me check\nCLIENT (User): Thanks"
    );
}

#[test]
fn skips_unknown_roles_non_messages_and_blank_text() {
    let transcript = extract(json!({"audits": [{"events": [chat(json!([
        message("system", "Chat started"),
        {"type": "ChatFileAttachment", "actor_type": "end-user", "message": "file.png"},
        message("end-user", "   "),
        {"type": "ChatMessage", "actor_type": "agent"},
        message("agent", "  Hello there  "),
    ]))]}]}));

    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.utterances()[0].role(), Some(SpeakerRole::Agent));
    assert_eq!(transcript.utterances()[0].text(), "Hello there");
}

#[test]
fn drops_ignore_listed_phrases_exactly_or_partially() {
    let transcript = extract(json!({"audits": [{"events": [chat(json!([
        message("end-user", "Main Menu"),
        message("end-user", "> Start Chat <"),
        message("end-user", "Where is my parcel?"),
    ]))]}]}));

    assert_eq!(transcript.render(), "CLIENT (User): Where is my parcel?");
}

#[test]
fn custom_ignore_list_replaces_defaults() {
    let extractor = TranscriptExtractor::new(TranscriptOptions {
        ignore_phrases: vec!["Operator joined".to_owned()],
        ..TranscriptOptions::default()
    });
    let log = AuditLog::from_json(&json!({"audits": [{"events": [chat(json!([
        message("agent", "Operator joined"),
        message("end-user", "Main Menu"),
    ]))]}]}));

    let transcript = extractor.extract(&log, &UserDirectory::new());
    assert_eq!(transcript.render(), "CLIENT (User): Main Menu");
}

#[test]
fn resolves_names_from_directory_then_inline_name() {
    let mut directory = UserDirectory::new();
    directory.insert(77, "Anna Petrova");
    let log = AuditLog::from_json(&json!({"audits": [{"events": [chat(json!([
        {"type": "ChatMessage", "actor_type": "agent", "actor_id": 77,
         "actor_name": "Anna (chat)", "message": "Hi"},
        {"type": "ChatMessage", "actor_type": "end-user", "actor_id": 501,
         "actor_name": "Visitor 501", "message": "Hello"},
    ]))]}]}));

    let transcript = TranscriptExtractor::default().extract(&log, &directory);
    assert_eq!(
        transcript.render(),
        "AGENT (Anna Petrova): Hi\nCLIENT (Visitor 501): Hello"
    );
}

#[test]
fn falls_back_to_public_comments_in_audit_order() {
    let mut directory = UserDirectory::new();
    directory.insert(10, "Agent Smith");
    let log = AuditLog::from_json(&json!({"audits": [
        {"events": [
            {"type": "Comment", "public": true, "plain_body": "Printer is broken", "author_id": 99},
            {"type": "Comment", "public": false, "plain_body": "internal note", "author_id": 10}
        ]},
        {"events": [
            {"type": "Comment", "public": true, "body": "<p>Replaced toner</p>",
             "plain_body": "Replaced toner", "author_id": 10},
            {"type": "Comment", "public": true, "body": "Rich only", "author_id": 10}
        ]}
    ]}));

    let transcript = TranscriptExtractor::default().extract(&log, &directory);
    assert_eq!(
        transcript.render(),
        "AGENT: Printer is broken\nAgent Smith: Replaced toner\nAgent Smith: Rich only"
    );
    assert!(transcript.utterances().iter().all(|line| line.role().is_none()));
}

#[test]
fn chat_history_takes_precedence_over_comments() {
    let transcript = extract(json!({"audits": [
        {"events": [{"type": "Comment", "public": true, "plain_body": "comment"}]},
        {"events": [chat(json!([message("end-user", "chat line")]))]}
    ]}));

    assert_eq!(transcript.render(), "CLIENT (User): chat line");
}

#[test]
fn fallback_comments_are_capped() {
    let comments: Vec<Value> = (0..5)
        .map(|index| json!({"type": "Comment", "public": true, "plain_body": format!("c{index}")}))
        .collect();
    let extractor = TranscriptExtractor::new(TranscriptOptions {
        max_fallback_comments: 2,
        ..TranscriptOptions::default()
    });

    let transcript = extractor.extract(
        &AuditLog::from_json(&json!({"audits": [{"events": comments}]})),
        &UserDirectory::new(),
    );
    assert_eq!(transcript.render(), "AGENT: c0\nAGENT: c1");
}

#[test]
fn no_dialogue_yields_empty_transcript() {
    let transcript = extract(json!({"audits": [{"events": [
        {"type": "Comment", "public": false, "plain_body": "internal"},
        {"type": "Change", "field_name": "status", "value": "open"}
    ]}]}));

    assert!(transcript.is_empty());
    assert_eq!(transcript.render(), "");
}

proptest! {
    #[test]
    fn chat_only_logs_keep_source_order_and_labels(
        lines in prop::collection::vec((any::<bool>(), "[a-z]{1,12}"), 1..20)
    ) {
        let history: Vec<Value> = lines
            .iter()
            .map(|(from_client, text)| {
                message(if *from_client { "end-user" } else { "agent" }, text)
            })
            .collect();
        let transcript = extract(json!({"audits": [{"events": [chat(Value::Array(history))]}]}));

        prop_assert_eq!(transcript.len(), lines.len());
        for (utterance, (from_client, text)) in transcript.utterances().iter().zip(lines.iter()) {
            let expected = if *from_client { SpeakerRole::Client } else { SpeakerRole::Agent };
            prop_assert_eq!(utterance.role(), Some(expected));
            prop_assert_eq!(utterance.text(), text.as_str());
        }
    }
}
