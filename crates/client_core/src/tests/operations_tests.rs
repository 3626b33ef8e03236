use super::*;
use serde_json::json;
use shared::domain::{AssemblyFlavor, Channel, Mode};

fn state_with(code: &str) -> AppState {
    AppState {
        code: code.to_string(),
        ..AppState::default()
    }
}

fn body_of(operation: &RemoteOperation, state: &AppState) -> Value {
    (operation.payload)(state)
        .expect("serializable")
        .expect("has body")
}

#[test]
fn compile_payloads_differ_only_in_target() {
    let table = OperationTable::default();
    let state = state_with("fn main() {}");

    let mut bodies = Vec::new();
    for target in CompileTarget::ALL {
        let operation = table.compile(*target);
        assert_eq!(operation.path, routes::COMPILE);
        assert_eq!(operation.method, Method::Post);

        let mut body = body_of(operation, &state);
        assert_eq!(body["target"], target.as_str());
        body.as_object_mut().expect("object").remove("target");
        bodies.push(body);
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(
        bodies[0],
        json!({
            "channel": "stable",
            "mode": "debug",
            "crateType": "bin",
            "tests": false,
            "code": "fn main() {}",
            "assemblyFlavor": "att",
        })
    );
}

#[test]
fn each_compile_target_has_its_own_event_triple() {
    let table = OperationTable::default();
    assert_eq!(
        (table.compile_assembly.events.started)(),
        Event::CompileAssemblyRequest
    );
    assert_eq!(
        (table.compile_llvm_ir.events.started)(),
        Event::CompileLlvmIrRequest
    );
    assert_eq!((table.compile_mir.events.started)(), Event::CompileMirRequest);
    assert_eq!(table.compile_mir.operation, Operation::CompileMir);
}

#[test]
fn execute_payload_reads_configuration_and_selectors() {
    let mut state = state_with("#[test]\nfn checks() {}\n");
    state.configuration.channel = Channel::Nightly;
    state.configuration.mode = Mode::Release;
    state.configuration.assembly_flavor = AssemblyFlavor::Intel;

    let body = body_of(&RemoteOperation::execute(), &state);
    assert_eq!(
        body,
        json!({
            "channel": "nightly",
            "mode": "release",
            "crateType": "lib",
            "tests": true,
            "code": "#[test]\nfn checks() {}\n",
        })
    );
}

#[test]
fn format_and_clippy_send_only_code() {
    let state = state_with("fn main(){}");
    for operation in [RemoteOperation::format(), RemoteOperation::clippy()] {
        assert_eq!(body_of(&operation, &state), json!({ "code": "fn main(){}" }));
    }
    assert_eq!(RemoteOperation::format().path, routes::FORMAT);
    assert_eq!(RemoteOperation::clippy().path, routes::CLIPPY);
}

#[test]
fn crates_load_is_a_bare_get() {
    let operation = RemoteOperation::crates_load();
    assert_eq!(operation.method, Method::Get);
    assert_eq!(operation.path, routes::META_CRATES);
    assert_eq!(
        (operation.payload)(&AppState::default()).expect("ok"),
        None
    );
}

#[test]
fn succeeded_decodes_contracted_fields() {
    let table = OperationTable::default();
    let event = (table.compile_mir.events.succeeded)(json!({
        "success": true,
        "code": "fn main() -> () {}",
        "stdout": "",
        "stderr": "Compiling playground",
    }))
    .expect("decode");

    assert_eq!(
        event,
        Event::CompileMirSucceeded {
            code: Some("fn main() -> () {}".into()),
            stdout: Some(String::new()),
            stderr: Some("Compiling playground".into()),
        }
    );
}

#[test]
fn succeeded_rejects_wrongly_typed_fields() {
    let table = OperationTable::default();
    assert!((table.execute.events.succeeded)(json!({ "stdout": 5 })).is_err());
}

#[test]
fn failed_carries_error_text() {
    let table = OperationTable::default();
    assert_eq!(
        (table.format.events.failed)(Some("boom".into())),
        Event::FormatFailed {
            error: Some("boom".into())
        }
    );
}
