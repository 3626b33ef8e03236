use super::*;
use crate::protocol::CompileResponse;

#[test]
fn serializes_with_explicit_type_tag() {
    let event = Event::ChangeChannel {
        channel: Channel::Nightly,
    };
    let json = serde_json::to_value(&event).expect("json");
    assert_eq!(json["type"], "change_channel");
    assert_eq!(json["payload"]["channel"], "nightly");

    let back: Event = serde_json::from_value(json).expect("decode");
    assert_eq!(back, event);
}

#[test]
fn unit_variants_round_trip_without_payload() {
    let json = serde_json::to_value(Event::ExecuteRequest).expect("json");
    assert_eq!(json["type"], "execute_request");
    assert!(json.get("payload").is_none());
}

#[test]
fn compile_variants_share_shape_but_not_tag() {
    let response = CompileResponse {
        code: Some("mov eax, 1".into()),
        stdout: Some(String::new()),
        stderr: Some("warning".into()),
    };
    let asm = Event::compile_assembly_succeeded(response.clone());
    let mir = Event::compile_mir_succeeded(response);

    assert_ne!(asm.name(), mir.name());
    assert_eq!(
        asm.lifecycle(),
        Some((Operation::CompileAssembly, Phase::Succeeded))
    );
    assert_eq!(mir.lifecycle(), Some((Operation::CompileMir, Phase::Succeeded)));
}

#[test]
fn lifecycle_classifies_phases() {
    assert_eq!(
        Event::GistSaveRequest.lifecycle(),
        Some((Operation::GistSave, Phase::Started))
    );
    assert!(!Event::GistSaveRequest.is_terminal());
    assert!(Event::gist_save_failed(None).is_terminal());
    assert_eq!(Event::edit_code("x").lifecycle(), None);
    assert!(!Event::navigate_to_help().is_terminal());
}

#[test]
fn failure_text_is_only_read_from_failure_variants() {
    assert_eq!(
        Event::format_failed(Some("boom".into())).failure(),
        Some("boom")
    );
    assert_eq!(Event::clippy_failed(None).failure(), None);
    assert_eq!(
        Event::ExecuteSucceeded {
            stdout: Some("boom".into()),
            stderr: None,
        }
        .failure(),
        None
    );
}

#[test]
fn gist_save_success_carries_channel() {
    let event = Event::gist_save_succeeded(
        crate::protocol::SavedSnippet {
            id: "abc".into(),
            url: "https://gist.github.com/abc".into(),
        },
        Channel::Beta,
    );
    assert_eq!(
        event,
        Event::GistSaveSucceeded {
            id: "abc".into(),
            url: "https://gist.github.com/abc".into(),
            channel: Channel::Beta,
        }
    );
}
