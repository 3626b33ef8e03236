//! Application state and the single reducer that folds events into it.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{AssemblyFlavor, Channel, Editor, Focus, Mode, Orientation, Page, Position},
    event::Event,
    protocol::CrateInfo,
};

const DEFAULT_CODE: &str = r#"fn main() {
    println!("Hello, world!");
}
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub shown: bool,
    pub editor: Editor,
    pub keybinding: String,
    pub theme: String,
    pub orientation: Orientation,
    pub assembly_flavor: AssemblyFlavor,
    pub channel: Channel,
    pub mode: Mode,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            shown: false,
            editor: Editor::default(),
            keybinding: "ace".into(),
            theme: "github".into(),
            orientation: Orientation::default(),
            assembly_flavor: AssemblyFlavor::default(),
            channel: Channel::default(),
            mode: Mode::default(),
        }
    }
}

/// Output of execute and clippy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleOutput {
    pub requests_in_progress: u32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOutput {
    pub requests_in_progress: u32,
    pub code: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOutput {
    pub requests_in_progress: u32,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistOutput {
    pub requests_in_progress: u32,
    pub id: Option<String>,
    pub url: Option<String>,
    pub channel: Option<Channel>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub focus: Option<Focus>,
    pub execute: SimpleOutput,
    pub assembly: CompileOutput,
    pub llvm_ir: CompileOutput,
    pub mir: CompileOutput,
    pub format: FormatOutput,
    pub clippy: SimpleOutput,
    pub gist: GistOutput,
    pub crates_requests_in_progress: u32,
    pub crates_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub page: Page,
    pub code: String,
    pub position: Position,
    pub configuration: Configuration,
    pub output: Output,
    pub crates: Vec<CrateInfo>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            page: Page::default(),
            code: DEFAULT_CODE.to_string(),
            position: Position::default(),
            configuration: Configuration::default(),
            output: Output::default(),
            crates: Vec::new(),
        }
    }
}

fn finish(counter: &mut u32) {
    *counter = counter.saturating_sub(1);
}

impl SimpleOutput {
    fn start(&mut self) {
        self.requests_in_progress += 1;
        self.stdout = None;
        self.stderr = None;
        self.error = None;
    }

    fn succeed(&mut self, stdout: &Option<String>, stderr: &Option<String>) {
        finish(&mut self.requests_in_progress);
        self.stdout = stdout.clone();
        self.stderr = stderr.clone();
        self.error = None;
    }

    fn fail(&mut self, error: &Option<String>) {
        finish(&mut self.requests_in_progress);
        self.error = error.clone();
    }
}

impl CompileOutput {
    fn start(&mut self) {
        self.requests_in_progress += 1;
        self.code = None;
        self.stdout = None;
        self.stderr = None;
        self.error = None;
    }

    fn succeed(&mut self, code: &Option<String>, stdout: &Option<String>, stderr: &Option<String>) {
        finish(&mut self.requests_in_progress);
        self.code = code.clone();
        self.stdout = stdout.clone();
        self.stderr = stderr.clone();
        self.error = None;
    }

    fn fail(&mut self, error: &Option<String>) {
        finish(&mut self.requests_in_progress);
        self.error = error.clone();
    }
}

impl AppState {
    /// The only place state changes.
    pub fn apply(&mut self, event: &Event) {
        let output = &mut self.output;
        match event {
            Event::ToggleConfiguration => self.configuration.shown = !self.configuration.shown,
            Event::SetPage { page } => self.page = *page,
            Event::ChangeEditor { editor } => self.configuration.editor = *editor,
            Event::ChangeKeybinding { keybinding } => {
                self.configuration.keybinding = keybinding.clone()
            }
            Event::ChangeTheme { theme } => self.configuration.theme = theme.clone(),
            Event::ChangeOrientation { orientation } => {
                self.configuration.orientation = *orientation
            }
            Event::ChangeAssemblyFlavor { assembly_flavor } => {
                self.configuration.assembly_flavor = *assembly_flavor
            }
            Event::ChangeChannel { channel } => self.configuration.channel = *channel,
            Event::ChangeMode { mode } => self.configuration.mode = *mode,
            Event::ChangeFocus { focus } => output.focus = *focus,
            Event::EditCode { code } => self.code = code.clone(),
            Event::GotoPosition { line, column } => {
                self.position = Position {
                    line: *line,
                    column: *column,
                }
            }

            Event::ExecuteRequest => {
                output.focus = Some(Focus::Execute);
                output.execute.start();
            }
            Event::ExecuteSucceeded { stdout, stderr } => output.execute.succeed(stdout, stderr),
            Event::ExecuteFailed { error } => output.execute.fail(error),

            Event::CompileAssemblyRequest => {
                output.focus = Some(Focus::Assembly);
                output.assembly.start();
            }
            Event::CompileAssemblySucceeded {
                code,
                stdout,
                stderr,
            } => output.assembly.succeed(code, stdout, stderr),
            Event::CompileAssemblyFailed { error } => output.assembly.fail(error),

            Event::CompileLlvmIrRequest => {
                output.focus = Some(Focus::LlvmIr);
                output.llvm_ir.start();
            }
            Event::CompileLlvmIrSucceeded {
                code,
                stdout,
                stderr,
            } => output.llvm_ir.succeed(code, stdout, stderr),
            Event::CompileLlvmIrFailed { error } => output.llvm_ir.fail(error),

            Event::CompileMirRequest => {
                output.focus = Some(Focus::Mir);
                output.mir.start();
            }
            Event::CompileMirSucceeded {
                code,
                stdout,
                stderr,
            } => output.mir.succeed(code, stdout, stderr),
            Event::CompileMirFailed { error } => output.mir.fail(error),

            Event::FormatRequest => {
                output.format.requests_in_progress += 1;
                output.format.error = None;
            }
            Event::FormatSucceeded { code } => {
                finish(&mut output.format.requests_in_progress);
                if let Some(code) = code {
                    self.code = code.clone();
                }
            }
            Event::FormatFailed { error } => {
                finish(&mut output.format.requests_in_progress);
                output.format.error = error.clone();
                output.focus = Some(Focus::Format);
            }

            Event::ClippyRequest => {
                output.focus = Some(Focus::Clippy);
                output.clippy.start();
            }
            Event::ClippySucceeded { stdout, stderr } => output.clippy.succeed(stdout, stderr),
            Event::ClippyFailed { error } => output.clippy.fail(error),

            Event::GistLoadRequest => {
                output.gist.requests_in_progress += 1;
                output.gist.error = None;
            }
            Event::GistLoadSucceeded { id, url, code } => {
                finish(&mut output.gist.requests_in_progress);
                output.gist.id = Some(id.clone());
                output.gist.url = Some(url.clone());
                self.code = code.clone();
            }
            Event::GistLoadFailed { error } => {
                finish(&mut output.gist.requests_in_progress);
                output.gist.error = error.clone();
            }

            Event::GistSaveRequest => {
                output.focus = Some(Focus::Gist);
                output.gist.requests_in_progress += 1;
                output.gist.error = None;
            }
            Event::GistSaveSucceeded { id, url, channel } => {
                finish(&mut output.gist.requests_in_progress);
                output.gist.id = Some(id.clone());
                output.gist.url = Some(url.clone());
                output.gist.channel = Some(*channel);
            }
            Event::GistSaveFailed { error } => {
                finish(&mut output.gist.requests_in_progress);
                output.gist.error = error.clone();
            }

            Event::CratesLoadRequest => {
                output.crates_requests_in_progress += 1;
                output.crates_error = None;
            }
            Event::CratesLoadSucceeded { crates } => {
                finish(&mut output.crates_requests_in_progress);
                self.crates = crates.clone();
            }
            Event::CratesLoadFailed { error } => {
                finish(&mut output.crates_requests_in_progress);
                output.crates_error = error.clone();
            }
        }
    }
}

/// Folds one event into a new snapshot.
pub fn reduce(mut state: AppState, event: &Event) -> AppState {
    state.apply(event);
    state
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
