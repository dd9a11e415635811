use std::sync::{Arc, Mutex};

use pybuild::targets::RunAction;

/// Shared log of which recorded actions ran, in order.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// An action that appends `label` to this log each time it is invoked.
    pub fn action(&self, label: &str) -> RecordingAction {
        RecordingAction {
            label: label.to_string(),
            calls: Arc::clone(&self.calls),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().unwrap().is_empty()
    }
}

/// Action produced by [`CallLog::action`].
#[derive(Debug, Clone)]
pub struct RecordingAction {
    label: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RunAction for RecordingAction {
    fn invoke(&self) {
        self.calls.lock().unwrap().push(self.label.clone());
    }
}
