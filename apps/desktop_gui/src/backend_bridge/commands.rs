//! Backend commands queued from UI to backend worker.

use client_core::PendingRequest;

pub enum BackendCommand {
    /// Perform an HTTP call the store has already dispatched.
    Perform(PendingRequest),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Perform(request) => request.name(),
        }
    }
}
