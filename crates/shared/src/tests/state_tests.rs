use super::*;
use crate::protocol::CrateInfo;

#[test]
fn request_focuses_pane_and_clears_previous_output() {
    let mut state = AppState::default();
    state.apply(&Event::ExecuteSucceeded {
        stdout: Some("old".into()),
        stderr: None,
    });

    state.apply(&Event::ExecuteRequest);

    assert_eq!(state.output.focus, Some(Focus::Execute));
    assert_eq!(state.output.execute.requests_in_progress, 1);
    assert_eq!(state.output.execute.stdout, None);
}

#[test]
fn terminal_events_settle_the_request_counter() {
    let state = [
        Event::CompileMirRequest,
        Event::CompileMirRequest,
        Event::CompileMirSucceeded {
            code: Some("fn main() -> () {}".into()),
            stdout: None,
            stderr: None,
        },
    ]
    .iter()
    .fold(AppState::default(), reduce);

    assert_eq!(state.output.mir.requests_in_progress, 1);
    assert_eq!(state.output.mir.code.as_deref(), Some("fn main() -> () {}"));

    let state = reduce(state, &Event::compile_mir_failed(Some("boom".into())));
    assert_eq!(state.output.mir.requests_in_progress, 0);
    assert_eq!(state.output.mir.error.as_deref(), Some("boom"));
}

#[test]
fn stray_terminal_event_does_not_underflow() {
    let state = reduce(AppState::default(), &Event::clippy_failed(None));
    assert_eq!(state.output.clippy.requests_in_progress, 0);
}

#[test]
fn format_success_replaces_code() {
    let state = [
        Event::edit_code("fn main(){}"),
        Event::FormatRequest,
        Event::FormatSucceeded {
            code: Some("fn main() {}\n".into()),
        },
    ]
    .iter()
    .fold(AppState::default(), reduce);

    assert_eq!(state.code, "fn main() {}\n");
    assert_eq!(state.output.format.requests_in_progress, 0);
}

#[test]
fn gist_load_replaces_code_and_records_link() {
    let state = reduce(
        AppState::default(),
        &Event::GistLoadSucceeded {
            id: "abc".into(),
            url: "https://gist.github.com/abc".into(),
            code: "fn loaded() {}".into(),
        },
    );

    assert_eq!(state.code, "fn loaded() {}");
    assert_eq!(state.output.gist.id.as_deref(), Some("abc"));
}

#[test]
fn gist_save_records_channel_and_focuses_gist() {
    let state = [
        Event::GistSaveRequest,
        Event::GistSaveSucceeded {
            id: "abc".into(),
            url: "https://gist.github.com/abc".into(),
            channel: Channel::Nightly,
        },
    ]
    .iter()
    .fold(AppState::default(), reduce);

    assert_eq!(state.output.focus, Some(Focus::Gist));
    assert_eq!(state.output.gist.channel, Some(Channel::Nightly));
    assert_eq!(state.output.gist.requests_in_progress, 0);
}

#[test]
fn configuration_events_update_configuration() {
    let state = [
        Event::ToggleConfiguration,
        Event::ChangeChannel {
            channel: Channel::Beta,
        },
        Event::ChangeMode {
            mode: Mode::Release,
        },
        Event::ChangeAssemblyFlavor {
            assembly_flavor: AssemblyFlavor::Intel,
        },
        Event::ChangeEditor {
            editor: Editor::Simple,
        },
        Event::ChangeTheme {
            theme: "monokai".into(),
        },
        Event::navigate_to_help(),
        Event::goto_position(3, 7),
    ]
    .iter()
    .fold(AppState::default(), reduce);

    assert!(state.configuration.shown);
    assert_eq!(state.configuration.channel, Channel::Beta);
    assert_eq!(state.configuration.mode, Mode::Release);
    assert_eq!(state.configuration.assembly_flavor, AssemblyFlavor::Intel);
    assert_eq!(state.configuration.editor, Editor::Simple);
    assert_eq!(state.configuration.theme, "monokai");
    assert_eq!(state.page, Page::Help);
    assert_eq!(state.position, Position { line: 3, column: 7 });
}

#[test]
fn crates_load_stores_crate_list() {
    let crates = vec![CrateInfo {
        id: "rand".into(),
        name: "rand".into(),
        version: "0.8.5".into(),
    }];
    let state = reduce(
        AppState::default(),
        &Event::CratesLoadSucceeded {
            crates: crates.clone(),
        },
    );
    assert_eq!(state.crates, crates);
}
