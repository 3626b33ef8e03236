//! Every state transition the application can observe.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{AssemblyFlavor, Channel, Editor, Focus, Mode, Orientation, Page},
    protocol::{
        ClippyResponse, CompileResponse, CrateInfo, CratesResponse, ExecuteResponse,
        FormatResponse, SavedSnippet, Snippet,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Event {
    ToggleConfiguration,
    SetPage {
        page: Page,
    },
    ChangeEditor {
        editor: Editor,
    },
    ChangeKeybinding {
        keybinding: String,
    },
    ChangeTheme {
        theme: String,
    },
    ChangeOrientation {
        orientation: Orientation,
    },
    ChangeAssemblyFlavor {
        assembly_flavor: AssemblyFlavor,
    },
    ChangeChannel {
        channel: Channel,
    },
    ChangeMode {
        mode: Mode,
    },
    ChangeFocus {
        focus: Option<Focus>,
    },
    EditCode {
        code: String,
    },
    GotoPosition {
        line: u32,
        column: u32,
    },

    ExecuteRequest,
    ExecuteSucceeded {
        stdout: Option<String>,
        stderr: Option<String>,
    },
    ExecuteFailed {
        error: Option<String>,
    },

    CompileAssemblyRequest,
    CompileAssemblySucceeded {
        code: Option<String>,
        stdout: Option<String>,
        stderr: Option<String>,
    },
    CompileAssemblyFailed {
        error: Option<String>,
    },

    CompileLlvmIrRequest,
    CompileLlvmIrSucceeded {
        code: Option<String>,
        stdout: Option<String>,
        stderr: Option<String>,
    },
    CompileLlvmIrFailed {
        error: Option<String>,
    },

    CompileMirRequest,
    CompileMirSucceeded {
        code: Option<String>,
        stdout: Option<String>,
        stderr: Option<String>,
    },
    CompileMirFailed {
        error: Option<String>,
    },

    FormatRequest,
    FormatSucceeded {
        code: Option<String>,
    },
    FormatFailed {
        error: Option<String>,
    },

    ClippyRequest,
    ClippySucceeded {
        stdout: Option<String>,
        stderr: Option<String>,
    },
    ClippyFailed {
        error: Option<String>,
    },

    GistLoadRequest,
    GistLoadSucceeded {
        id: String,
        url: String,
        code: String,
    },
    GistLoadFailed {
        error: Option<String>,
    },

    GistSaveRequest,
    GistSaveSucceeded {
        id: String,
        url: String,
        channel: Channel,
    },
    GistSaveFailed {
        error: Option<String>,
    },

    CratesLoadRequest,
    CratesLoadSucceeded {
        crates: Vec<CrateInfo>,
    },
    CratesLoadFailed {
        error: Option<String>,
    },
}

/// Remote operations that follow the started/succeeded/failed lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Execute,
    CompileAssembly,
    CompileLlvmIr,
    CompileMir,
    Format,
    Clippy,
    GistLoad,
    GistSave,
    CratesLoad,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Execute => "execute",
            Operation::CompileAssembly => "compile_assembly",
            Operation::CompileLlvmIr => "compile_llvm_ir",
            Operation::CompileMir => "compile_mir",
            Operation::Format => "format",
            Operation::Clippy => "clippy",
            Operation::GistLoad => "gist_load",
            Operation::GistSave => "gist_save",
            Operation::CratesLoad => "crates_load",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Started,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Phase::Started)
    }
}

impl Event {
    pub fn navigate_to_index() -> Self {
        Event::SetPage { page: Page::Index }
    }

    pub fn navigate_to_help() -> Self {
        Event::SetPage { page: Page::Help }
    }

    pub fn edit_code(code: impl Into<String>) -> Self {
        Event::EditCode { code: code.into() }
    }

    pub fn goto_position(line: u32, column: u32) -> Self {
        Event::GotoPosition { line, column }
    }

    pub fn execute_succeeded(response: ExecuteResponse) -> Self {
        Event::ExecuteSucceeded {
            stdout: response.stdout,
            stderr: response.stderr,
        }
    }

    pub fn execute_failed(error: Option<String>) -> Self {
        Event::ExecuteFailed { error }
    }

    pub fn compile_assembly_succeeded(response: CompileResponse) -> Self {
        Event::CompileAssemblySucceeded {
            code: response.code,
            stdout: response.stdout,
            stderr: response.stderr,
        }
    }

    pub fn compile_assembly_failed(error: Option<String>) -> Self {
        Event::CompileAssemblyFailed { error }
    }

    pub fn compile_llvm_ir_succeeded(response: CompileResponse) -> Self {
        Event::CompileLlvmIrSucceeded {
            code: response.code,
            stdout: response.stdout,
            stderr: response.stderr,
        }
    }

    pub fn compile_llvm_ir_failed(error: Option<String>) -> Self {
        Event::CompileLlvmIrFailed { error }
    }

    pub fn compile_mir_succeeded(response: CompileResponse) -> Self {
        Event::CompileMirSucceeded {
            code: response.code,
            stdout: response.stdout,
            stderr: response.stderr,
        }
    }

    pub fn compile_mir_failed(error: Option<String>) -> Self {
        Event::CompileMirFailed { error }
    }

    pub fn format_succeeded(response: FormatResponse) -> Self {
        Event::FormatSucceeded {
            code: response.code,
        }
    }

    pub fn format_failed(error: Option<String>) -> Self {
        Event::FormatFailed { error }
    }

    pub fn clippy_succeeded(response: ClippyResponse) -> Self {
        Event::ClippySucceeded {
            stdout: response.stdout,
            stderr: response.stderr,
        }
    }

    pub fn clippy_failed(error: Option<String>) -> Self {
        Event::ClippyFailed { error }
    }

    pub fn gist_load_succeeded(snippet: Snippet) -> Self {
        Event::GistLoadSucceeded {
            id: snippet.id,
            url: snippet.url,
            code: snippet.code,
        }
    }

    pub fn gist_load_failed(error: Option<String>) -> Self {
        Event::GistLoadFailed { error }
    }

    /// The store does not know which channel the code targets, so the caller
    /// supplies the one that was active when the save began.
    pub fn gist_save_succeeded(saved: SavedSnippet, channel: Channel) -> Self {
        Event::GistSaveSucceeded {
            id: saved.id,
            url: saved.url,
            channel,
        }
    }

    pub fn gist_save_failed(error: Option<String>) -> Self {
        Event::GistSaveFailed { error }
    }

    pub fn crates_load_succeeded(response: CratesResponse) -> Self {
        Event::CratesLoadSucceeded {
            crates: response.crates,
        }
    }

    pub fn crates_load_failed(error: Option<String>) -> Self {
        Event::CratesLoadFailed { error }
    }

    /// Which remote lifecycle this event belongs to, if any.
    pub fn lifecycle(&self) -> Option<(Operation, Phase)> {
        use Operation as Op;
        use Phase::*;

        let tagged = match self {
            Event::ExecuteRequest => (Op::Execute, Started),
            Event::ExecuteSucceeded { .. } => (Op::Execute, Succeeded),
            Event::ExecuteFailed { .. } => (Op::Execute, Failed),
            Event::CompileAssemblyRequest => (Op::CompileAssembly, Started),
            Event::CompileAssemblySucceeded { .. } => (Op::CompileAssembly, Succeeded),
            Event::CompileAssemblyFailed { .. } => (Op::CompileAssembly, Failed),
            Event::CompileLlvmIrRequest => (Op::CompileLlvmIr, Started),
            Event::CompileLlvmIrSucceeded { .. } => (Op::CompileLlvmIr, Succeeded),
            Event::CompileLlvmIrFailed { .. } => (Op::CompileLlvmIr, Failed),
            Event::CompileMirRequest => (Op::CompileMir, Started),
            Event::CompileMirSucceeded { .. } => (Op::CompileMir, Succeeded),
            Event::CompileMirFailed { .. } => (Op::CompileMir, Failed),
            Event::FormatRequest => (Op::Format, Started),
            Event::FormatSucceeded { .. } => (Op::Format, Succeeded),
            Event::FormatFailed { .. } => (Op::Format, Failed),
            Event::ClippyRequest => (Op::Clippy, Started),
            Event::ClippySucceeded { .. } => (Op::Clippy, Succeeded),
            Event::ClippyFailed { .. } => (Op::Clippy, Failed),
            Event::GistLoadRequest => (Op::GistLoad, Started),
            Event::GistLoadSucceeded { .. } => (Op::GistLoad, Succeeded),
            Event::GistLoadFailed { .. } => (Op::GistLoad, Failed),
            Event::GistSaveRequest => (Op::GistSave, Started),
            Event::GistSaveSucceeded { .. } => (Op::GistSave, Succeeded),
            Event::GistSaveFailed { .. } => (Op::GistSave, Failed),
            Event::CratesLoadRequest => (Op::CratesLoad, Started),
            Event::CratesLoadSucceeded { .. } => (Op::CratesLoad, Succeeded),
            Event::CratesLoadFailed { .. } => (Op::CratesLoad, Failed),
            _ => return None,
        };
        Some(tagged)
    }

    pub fn is_terminal(&self) -> bool {
        self.lifecycle()
            .map(|(_, phase)| phase.is_terminal())
            .unwrap_or(false)
    }

    /// Error text carried by a failure event.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Event::ExecuteFailed { error }
            | Event::CompileAssemblyFailed { error }
            | Event::CompileLlvmIrFailed { error }
            | Event::CompileMirFailed { error }
            | Event::FormatFailed { error }
            | Event::ClippyFailed { error }
            | Event::GistLoadFailed { error }
            | Event::GistSaveFailed { error }
            | Event::CratesLoadFailed { error } => error.as_deref(),
            _ => None,
        }
    }

    /// Short stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Event::ToggleConfiguration => "toggle_configuration",
            Event::SetPage { .. } => "set_page",
            Event::ChangeEditor { .. } => "change_editor",
            Event::ChangeKeybinding { .. } => "change_keybinding",
            Event::ChangeTheme { .. } => "change_theme",
            Event::ChangeOrientation { .. } => "change_orientation",
            Event::ChangeAssemblyFlavor { .. } => "change_assembly_flavor",
            Event::ChangeChannel { .. } => "change_channel",
            Event::ChangeMode { .. } => "change_mode",
            Event::ChangeFocus { .. } => "change_focus",
            Event::EditCode { .. } => "edit_code",
            Event::GotoPosition { .. } => "goto_position",
            Event::ExecuteRequest => "execute_request",
            Event::ExecuteSucceeded { .. } => "execute_succeeded",
            Event::ExecuteFailed { .. } => "execute_failed",
            Event::CompileAssemblyRequest => "compile_assembly_request",
            Event::CompileAssemblySucceeded { .. } => "compile_assembly_succeeded",
            Event::CompileAssemblyFailed { .. } => "compile_assembly_failed",
            Event::CompileLlvmIrRequest => "compile_llvm_ir_request",
            Event::CompileLlvmIrSucceeded { .. } => "compile_llvm_ir_succeeded",
            Event::CompileLlvmIrFailed { .. } => "compile_llvm_ir_failed",
            Event::CompileMirRequest => "compile_mir_request",
            Event::CompileMirSucceeded { .. } => "compile_mir_succeeded",
            Event::CompileMirFailed { .. } => "compile_mir_failed",
            Event::FormatRequest => "format_request",
            Event::FormatSucceeded { .. } => "format_succeeded",
            Event::FormatFailed { .. } => "format_failed",
            Event::ClippyRequest => "clippy_request",
            Event::ClippySucceeded { .. } => "clippy_succeeded",
            Event::ClippyFailed { .. } => "clippy_failed",
            Event::GistLoadRequest => "gist_load_request",
            Event::GistLoadSucceeded { .. } => "gist_load_succeeded",
            Event::GistLoadFailed { .. } => "gist_load_failed",
            Event::GistSaveRequest => "gist_save_request",
            Event::GistSaveSucceeded { .. } => "gist_save_succeeded",
            Event::GistSaveFailed { .. } => "gist_save_failed",
            Event::CratesLoadRequest => "crates_load_request",
            Event::CratesLoadSucceeded { .. } => "crates_load_succeeded",
            Event::CratesLoadFailed { .. } => "crates_load_failed",
        }
    }
}

#[cfg(test)]
#[path = "tests/event_tests.rs"]
mod tests;
