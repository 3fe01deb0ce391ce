use spin_gate::{GateClient, TaskWatcher};

/// Shared resources for command handlers, built once by `bootstrap`.
pub struct AppContext {
    pub gate: GateClient,
    pub watcher: TaskWatcher,
}

impl AppContext {
    #[must_use]
    pub fn new(gate: GateClient) -> Self {
        Self {
            gate,
            watcher: TaskWatcher::default(),
        }
    }
}
