//! Descriptors for every backend operation. A descriptor is plain data: where
//! to send the request, how to build its body from state, and which three
//! events mark its lifecycle. One routine in [`crate::PlaygroundClient`]
//! drives all of them.

use serde_json::Value;
use shared::{
    domain::CompileTarget,
    event::{Event, Operation},
    protocol::{ClippyRequest, CompileRequest, ExecuteRequest, FormatRequest},
    selectors,
    state::AppState,
};

use crate::transport::Method;

pub mod routes {
    pub const EXECUTE: &str = "/execute";
    pub const COMPILE: &str = "/compile";
    pub const FORMAT: &str = "/format";
    pub const CLIPPY: &str = "/clippy";
    pub const META_CRATES: &str = "/meta/crates";
}

pub type PayloadBuilder = Box<dyn Fn(&AppState) -> serde_json::Result<Option<Value>> + Send + Sync>;

/// Constructors for the started, succeeded and failed events of one
/// operation. `succeeded` decodes the raw response body.
#[derive(Clone, Copy)]
pub struct EventTriple {
    pub started: fn() -> Event,
    pub succeeded: fn(Value) -> serde_json::Result<Event>,
    pub failed: fn(Option<String>) -> Event,
}

pub struct RemoteOperation {
    pub operation: Operation,
    pub method: Method,
    pub path: &'static str,
    pub payload: PayloadBuilder,
    pub events: EventTriple,
}

pub fn execute_request(state: &AppState) -> ExecuteRequest {
    ExecuteRequest {
        channel: state.configuration.channel,
        mode: state.configuration.mode,
        crate_type: selectors::crate_type(state),
        tests: selectors::run_as_test(state),
        code: state.code.clone(),
    }
}

pub fn compile_request(state: &AppState, target: CompileTarget) -> CompileRequest {
    CompileRequest {
        channel: state.configuration.channel,
        mode: state.configuration.mode,
        crate_type: selectors::crate_type(state),
        tests: selectors::run_as_test(state),
        code: state.code.clone(),
        target,
        assembly_flavor: state.configuration.assembly_flavor,
    }
}

/// Event triple for each compile target; the targets differ in nothing else.
pub fn compile_events(target: CompileTarget) -> (Operation, EventTriple) {
    match target {
        CompileTarget::Assembly => (
            Operation::CompileAssembly,
            EventTriple {
                started: || Event::CompileAssemblyRequest,
                succeeded: |body| {
                    serde_json::from_value(body).map(Event::compile_assembly_succeeded)
                },
                failed: Event::compile_assembly_failed,
            },
        ),
        CompileTarget::LlvmIr => (
            Operation::CompileLlvmIr,
            EventTriple {
                started: || Event::CompileLlvmIrRequest,
                succeeded: |body| {
                    serde_json::from_value(body).map(Event::compile_llvm_ir_succeeded)
                },
                failed: Event::compile_llvm_ir_failed,
            },
        ),
        CompileTarget::Mir => (
            Operation::CompileMir,
            EventTriple {
                started: || Event::CompileMirRequest,
                succeeded: |body| serde_json::from_value(body).map(Event::compile_mir_succeeded),
                failed: Event::compile_mir_failed,
            },
        ),
    }
}

impl RemoteOperation {
    pub fn execute() -> Self {
        Self {
            operation: Operation::Execute,
            method: Method::Post,
            path: routes::EXECUTE,
            payload: Box::new(|state: &AppState| {
                serde_json::to_value(execute_request(state)).map(Some)
            }),
            events: EventTriple {
                started: || Event::ExecuteRequest,
                succeeded: |body| serde_json::from_value(body).map(Event::execute_succeeded),
                failed: Event::execute_failed,
            },
        }
    }

    /// The one compile routine; `target` is threaded into the body and
    /// nothing else varies besides the event triple.
    pub fn compile(operation: Operation, target: CompileTarget, events: EventTriple) -> Self {
        Self {
            operation,
            method: Method::Post,
            path: routes::COMPILE,
            payload: Box::new(move |state: &AppState| {
                serde_json::to_value(compile_request(state, target)).map(Some)
            }),
            events,
        }
    }

    pub fn format() -> Self {
        Self {
            operation: Operation::Format,
            method: Method::Post,
            path: routes::FORMAT,
            payload: Box::new(|state: &AppState| {
                serde_json::to_value(FormatRequest {
                    code: state.code.clone(),
                })
                .map(Some)
            }),
            events: EventTriple {
                started: || Event::FormatRequest,
                succeeded: |body| serde_json::from_value(body).map(Event::format_succeeded),
                failed: Event::format_failed,
            },
        }
    }

    pub fn clippy() -> Self {
        Self {
            operation: Operation::Clippy,
            method: Method::Post,
            path: routes::CLIPPY,
            payload: Box::new(|state: &AppState| {
                serde_json::to_value(ClippyRequest {
                    code: state.code.clone(),
                })
                .map(Some)
            }),
            events: EventTriple {
                started: || Event::ClippyRequest,
                succeeded: |body| serde_json::from_value(body).map(Event::clippy_succeeded),
                failed: Event::clippy_failed,
            },
        }
    }

    pub fn crates_load() -> Self {
        Self {
            operation: Operation::CratesLoad,
            method: Method::Get,
            path: routes::META_CRATES,
            payload: Box::new(|_: &AppState| Ok(None)),
            events: EventTriple {
                started: || Event::CratesLoadRequest,
                succeeded: |body| serde_json::from_value(body).map(Event::crates_load_succeeded),
                failed: Event::crates_load_failed,
            },
        }
    }
}

/// All backend descriptors, built once when the client starts.
pub struct OperationTable {
    pub execute: RemoteOperation,
    pub compile_assembly: RemoteOperation,
    pub compile_llvm_ir: RemoteOperation,
    pub compile_mir: RemoteOperation,
    pub format: RemoteOperation,
    pub clippy: RemoteOperation,
    pub crates_load: RemoteOperation,
}

impl Default for OperationTable {
    fn default() -> Self {
        let compile = |target| {
            let (operation, events) = compile_events(target);
            RemoteOperation::compile(operation, target, events)
        };
        Self {
            execute: RemoteOperation::execute(),
            compile_assembly: compile(CompileTarget::Assembly),
            compile_llvm_ir: compile(CompileTarget::LlvmIr),
            compile_mir: compile(CompileTarget::Mir),
            format: RemoteOperation::format(),
            clippy: RemoteOperation::clippy(),
            crates_load: RemoteOperation::crates_load(),
        }
    }
}

impl OperationTable {
    pub fn compile(&self, target: CompileTarget) -> &RemoteOperation {
        match target {
            CompileTarget::Assembly => &self.compile_assembly,
            CompileTarget::LlvmIr => &self.compile_llvm_ir,
            CompileTarget::Mir => &self.compile_mir,
        }
    }
}

#[cfg(test)]
#[path = "tests/operations_tests.rs"]
mod tests;
