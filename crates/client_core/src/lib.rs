use std::{
    collections::HashMap,
    future::Future,
    panic::AssertUnwindSafe,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use anyhow::Result;
use futures::future::{self, BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use shared::{
    domain::{parse_channel, parse_mode, CompileTarget},
    event::{Event, Operation},
    state::AppState,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod operations;
pub mod page_load;
pub mod snippets;
pub mod store;
pub mod transport;

pub use config::{load_settings, ClientSettings, DuplicatePolicy};
pub use error::{SnippetError, TransportError};
pub use operations::{EventTriple, OperationTable, RemoteOperation};
pub use page_load::PageLoadParams;
pub use snippets::{GistStore, MissingSnippetStore, SnippetStore};
pub use store::Store;
pub use transport::{HttpTransport, Method, MissingTransport, Transport};

/// Resolves to the terminal event of one operation. Operations run on their
/// own task whether or not the handle is awaited; dropping it does not cancel
/// anything.
#[derive(Clone)]
pub struct OperationHandle(Shared<BoxFuture<'static, Event>>);

impl Future for OperationHandle {
    type Output = Event;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Event> {
        self.0.poll_unpin(cx)
    }
}

type InflightRegistry = Arc<Mutex<HashMap<String, OperationHandle>>>;

/// Removes an in-flight entry even if the operation unwinds.
struct InflightGuard {
    registry: InflightRegistry,
    key: Option<String>,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.registry.lock().remove(&key);
        }
    }
}

const NO_RUNTIME: &str = "no async runtime available";
const DEFAULT_VERSION: &str = "stable";
const DEFAULT_MODE: &str = "debug";

fn dedupe_key(operation: Operation, input: &str) -> String {
    format!("{}:{input}", operation.as_str())
}

pub struct PlaygroundClient {
    transport: Arc<dyn Transport>,
    snippets: Arc<dyn SnippetStore>,
    store: Arc<Store>,
    operations: OperationTable,
    policy: DuplicatePolicy,
    inflight: InflightRegistry,
}

impl PlaygroundClient {
    pub fn new(transport: Arc<dyn Transport>, snippets: Arc<dyn SnippetStore>) -> Arc<Self> {
        Self::new_with_dependencies(
            transport,
            snippets,
            Arc::new(Store::default()),
            DuplicatePolicy::Allow,
        )
    }

    pub fn new_with_dependencies(
        transport: Arc<dyn Transport>,
        snippets: Arc<dyn SnippetStore>,
        store: Arc<Store>,
        policy: DuplicatePolicy,
    ) -> Arc<Self> {
        Arc::new(Self {
            transport,
            snippets,
            store,
            operations: OperationTable::default(),
            policy,
            inflight: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Arc<Self>> {
        let timeout = settings.request_timeout();
        let backend = HttpTransport::new(&settings.server_url, timeout)?;
        let gist_api = HttpTransport::new(&settings.gist_api_url, timeout)?;
        info!(
            server_url = %backend.base_url(),
            policy = ?settings.duplicate_policy,
            "playground client configured"
        );
        Ok(Self::new_with_dependencies(
            Arc::new(backend),
            Arc::new(GistStore::new(Arc::new(gist_api))),
            Arc::new(Store::default()),
            settings.duplicate_policy,
        ))
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn state(&self) -> AppState {
        self.store.snapshot()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.store.subscribe()
    }

    pub fn dispatch(&self, event: Event) {
        self.store.dispatch(event);
    }

    pub fn perform_execute(&self) -> OperationHandle {
        self.perform(&self.operations.execute)
    }

    pub fn perform_compile(&self, target: CompileTarget) -> OperationHandle {
        self.perform(self.operations.compile(target))
    }

    pub fn perform_compile_to_assembly(&self) -> OperationHandle {
        self.perform_compile(CompileTarget::Assembly)
    }

    pub fn perform_compile_to_llvm_ir(&self) -> OperationHandle {
        self.perform_compile(CompileTarget::LlvmIr)
    }

    pub fn perform_compile_to_mir(&self) -> OperationHandle {
        self.perform_compile(CompileTarget::Mir)
    }

    pub fn perform_format(&self) -> OperationHandle {
        self.perform(&self.operations.format)
    }

    pub fn perform_clippy(&self) -> OperationHandle {
        self.perform(&self.operations.clippy)
    }

    pub fn perform_crates_load(&self) -> OperationHandle {
        self.perform(&self.operations.crates_load)
    }

    pub fn perform_gist_load(&self, id: impl Into<String>) -> OperationHandle {
        let id = id.into();
        let key = dedupe_key(Operation::GistLoad, &id);
        let snippets = self.snippets.clone();
        self.launch(
            Operation::GistLoad,
            Some(key),
            Event::GistLoadRequest,
            Event::gist_load_failed,
            async move {
                snippets
                    .load(&id)
                    .await
                    .map(Event::gist_load_succeeded)
                    .map_err(|err| err.failure_message())
            },
        )
    }

    /// The channel recorded with the saved snippet is the one active when the
    /// save began.
    pub fn perform_gist_save(&self) -> OperationHandle {
        let (code, channel) = self
            .store
            .read(|state| (state.code.clone(), state.configuration.channel));
        let key = dedupe_key(Operation::GistSave, &format!("{channel}:{code}"));
        let snippets = self.snippets.clone();
        self.launch(
            Operation::GistSave,
            Some(key),
            Event::GistSaveRequest,
            Event::gist_save_failed,
            async move {
                snippets
                    .save(&code)
                    .await
                    .map(|saved| Event::gist_save_succeeded(saved, channel))
                    .map_err(|err| err.failure_message())
            },
        )
    }

    /// Restores state from deep-link parameters. Returns the snippet load if
    /// one was started; its result arrives later as an event. Unrecognised
    /// version or mode names are ignored.
    pub fn index_page_load(&self, params: PageLoadParams) -> Option<OperationHandle> {
        self.store.dispatch(Event::navigate_to_index());

        let mut gist_load = None;
        if let Some(code) = params.code.filter(|code| !code.is_empty()) {
            self.store.dispatch(Event::edit_code(code));
        } else if let Some(id) = params.gist.filter(|id| !id.is_empty()) {
            gist_load = Some(self.perform_gist_load(id));
        }

        // A link without a version or mode resets to stable/debug.
        let version = params.version.filter(|v| !v.is_empty());
        if let Some(channel) = parse_channel(version.as_deref().unwrap_or(DEFAULT_VERSION)) {
            self.store.dispatch(Event::ChangeChannel { channel });
        }
        let mode = params.mode.filter(|m| !m.is_empty());
        if let Some(mode) = parse_mode(mode.as_deref().unwrap_or(DEFAULT_MODE)) {
            self.store.dispatch(Event::ChangeMode { mode });
        }

        gist_load
    }

    pub fn help_page_load(&self) {
        self.store.dispatch(Event::navigate_to_help());
    }

    pub fn show_example(&self, code: impl Into<String>) {
        self.store.dispatch(Event::navigate_to_index());
        self.store.dispatch(Event::edit_code(code));
    }

    /// Runs one backend descriptor: body built from the current snapshot,
    /// sent through the transport, response decoded by the descriptor.
    fn perform(&self, descriptor: &RemoteOperation) -> OperationHandle {
        let payload = self.store.read(|state| (descriptor.payload)(state));
        let key = payload.as_ref().ok().map(|body| {
            let input = body.as_ref().map(ToString::to_string).unwrap_or_default();
            dedupe_key(descriptor.operation, &input)
        });

        let transport = self.transport.clone();
        let (method, path, succeeded) = (
            descriptor.method,
            descriptor.path,
            descriptor.events.succeeded,
        );
        self.launch(
            descriptor.operation,
            key,
            (descriptor.events.started)(),
            descriptor.events.failed,
            async move {
                let body = payload.map_err(|err| Some(err.to_string()))?;
                let response = transport
                    .send(method, path, body)
                    .await
                    .map_err(|err| err.failure_message())?;
                succeeded(response).map_err(|err| Some(format!("malformed response: {err}")))
            },
        )
    }

    /// Emits `started`, then drives `call` on its own task and emits exactly
    /// one terminal event when it settles.
    fn launch<F>(
        &self,
        operation: Operation,
        key: Option<String>,
        started: Event,
        failed: fn(Option<String>) -> Event,
        call: F,
    ) -> OperationHandle
    where
        F: Future<Output = std::result::Result<Event, Option<String>>> + Send + 'static,
    {
        let key = key.filter(|_| self.policy == DuplicatePolicy::Coalesce);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                operation = operation.as_str(),
                "no async runtime available; failing operation"
            );
            self.store.dispatch(started);
            let terminal = failed(Some(NO_RUNTIME.to_string()));
            self.store.dispatch(terminal.clone());
            return OperationHandle(future::ready(terminal).boxed().shared());
        };

        // Held until the new entry is registered so a fast task cannot remove
        // its key before it exists.
        let mut inflight = self.inflight.lock();
        if let Some(existing) = key.as_ref().and_then(|key| inflight.get(key)) {
            info!(
                operation = operation.as_str(),
                "joining identical in-flight operation"
            );
            return existing.clone();
        }

        self.store.dispatch(started);
        debug!(operation = operation.as_str(), "operation started");

        let store = self.store.clone();
        let registry = self.inflight.clone();
        let guard_key = key.clone();
        let task = runtime.spawn(async move {
            // Created on first poll so a task dropped unpolled never touches
            // the registry while `launch` still holds it.
            let guard = InflightGuard {
                registry,
                key: guard_key,
            };
            let outcome = AssertUnwindSafe(call)
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(Some("operation panicked".to_string())));
            let terminal = match outcome {
                Ok(event) => event,
                Err(error) => {
                    warn!(
                        operation = operation.as_str(),
                        error = error.as_deref().unwrap_or("<none>"),
                        "operation failed"
                    );
                    failed(error)
                }
            };
            store.dispatch(terminal.clone());
            drop(guard);
            terminal
        });

        let handle = OperationHandle(
            async move {
                task.await
                    .unwrap_or_else(|err| failed(Some(err.to_string())))
            }
            .boxed()
            .shared(),
        );
        if let Some(key) = key {
            inflight.insert(key, handle.clone());
        }
        handle
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
