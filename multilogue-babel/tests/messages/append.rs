//! Tests for appending a worker reply

use crate::common::republic;
use multilogue_babel::formats::messages::{append_reply, to_messages};
use multilogue_babel::transforms::messages_to_script;
use multilogue_babel::worker::{Exchange, MachineConfig, Settings, WorkerOutcome};
use multilogue_babel::{MappingError, Role, WorkerReply};

const REPUBLIC: &str = "Socrates (user):\nWhat is justice?\n\nGlaucon (assistant):\nGiving each his due.\n";

fn equity() -> WorkerReply {
    WorkerReply {
        role: Role::Assistant,
        content: "Perhaps equity.".to_string(),
    }
}

#[test]
fn test_documented_append() {
    let messages = append_reply(to_messages(&republic()), equity(), "Worker").unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(
        messages_to_script(&messages).unwrap(),
        format!("{REPUBLIC}\nWorker (assistant):\nPerhaps equity.\n")
    );
}

#[test]
fn test_append_is_monotonic() {
    let before = to_messages(&republic());
    let after = append_reply(before.clone(), equity(), "Worker").unwrap();
    assert_eq!(&after[..before.len()], &before[..]);
}

#[test]
fn test_append_to_empty_list() {
    let messages = append_reply(Vec::new(), equity(), "Worker").unwrap();
    assert_eq!(
        messages_to_script(&messages).unwrap(),
        "Worker (assistant):\nPerhaps equity.\n"
    );
}

#[test]
fn test_blank_reply_is_rejected() {
    let reply = WorkerReply {
        role: Role::Assistant,
        content: "\n\n".to_string(),
    };
    assert_eq!(
        append_reply(to_messages(&republic()), reply, "Worker"),
        Err(MappingError::EmptyReply)
    );
}

#[test]
fn test_exchange_applies_wire_outcome() {
    let mut exchange = Exchange::new(MachineConfig::new("Worker"), Settings::new());
    let request = exchange.begin(to_messages(&republic())).unwrap();
    let outcome = WorkerOutcome::from_json(&format!(
        r#"{{"type":"success","id":{},"data":{{"role":"assistant","content":"Perhaps equity."}}}}"#,
        request.id.value()
    ))
    .unwrap();
    assert_eq!(
        exchange.resolve_against(outcome, REPUBLIC).unwrap(),
        format!("{REPUBLIC}\nWorker (assistant):\nPerhaps equity.\n")
    );
}
