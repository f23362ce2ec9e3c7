//! Events flowing from the backend worker to the UI thread.

use client_core::Action;

pub enum UiEvent {
    Info(String),
    /// A finished request, ready to be applied to the UI-owned store.
    Reconcile(Action),
    BackendUnavailable(String),
}
