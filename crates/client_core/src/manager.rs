use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::{
    domain::{ContactId, FormField},
    error::ValidationError,
    protocol::Contact,
};
use tokio::sync::{broadcast, Mutex};
use tracing::info;

use crate::{
    reducer::{ActionOutcome, SubmitPolicy},
    store::{execute, ContactStore, PendingRequest},
    transport::ContactsApi,
    types::ContactsState,
};

#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Emitted after every state change with the state to render.
    StateChanged(ContactsState),
}

/// Async front for a [`ContactStore`].
///
/// The store lock is released before any request is awaited, so operations
/// may overlap; overlapping responses are sorted out by request tokens.
pub struct ContactManager {
    api: Arc<dyn ContactsApi>,
    inner: Mutex<ContactStore>,
    activated: AtomicBool,
    events: broadcast::Sender<ClientEvent>,
}

impl ContactManager {
    pub fn new(api: Arc<dyn ContactsApi>, policy: SubmitPolicy) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            api,
            inner: Mutex::new(ContactStore::new(policy)),
            activated: AtomicBool::new(false),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ContactsState {
        self.inner.lock().await.state().clone()
    }

    /// Loads the collection the first time it is called; later calls are no-ops.
    pub async fn activate(&self) -> Option<ActionOutcome> {
        if self.activated.swap(true, Ordering::SeqCst) {
            return None;
        }
        info!("contacts: activating contact manager");
        Some(self.load_contacts().await)
    }

    pub async fn load_contacts(&self) -> ActionOutcome {
        let request = self.begin(ContactStore::begin_load).await;
        self.run(request).await
    }

    pub async fn update_field(&self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        self.begin(|store| store.update_field(field, value)).await;
    }

    pub async fn enter_edit(&self, contact: &Contact) {
        self.begin(|store| store.enter_edit(contact)).await;
    }

    pub async fn submit(&self) -> Result<ActionOutcome, ValidationError> {
        let request = {
            let mut guard = self.inner.lock().await;
            guard.begin_submit()?
        };
        self.emit().await;
        Ok(self.run(request).await)
    }

    pub async fn delete(&self, id: ContactId) -> ActionOutcome {
        let request = self.begin(|store| store.begin_delete(id)).await;
        self.run(request).await
    }

    async fn begin<T>(&self, f: impl FnOnce(&mut ContactStore) -> T) -> T {
        let (value, snapshot) = {
            let mut guard = self.inner.lock().await;
            let value = f(&mut *guard);
            (value, guard.state().clone())
        };
        let _ = self.events.send(ClientEvent::StateChanged(snapshot));
        value
    }

    async fn emit(&self) {
        let snapshot = self.snapshot().await;
        let _ = self.events.send(ClientEvent::StateChanged(snapshot));
    }

    async fn run(&self, request: PendingRequest) -> ActionOutcome {
        let action = execute(self.api.as_ref(), request).await;
        let (outcome, snapshot) = {
            let mut guard = self.inner.lock().await;
            let outcome = guard.apply(action);
            (outcome, guard.state().clone())
        };
        let _ = self.events.send(ClientEvent::StateChanged(snapshot));
        outcome
    }
}

#[cfg(test)]
#[path = "tests/manager_tests.rs"]
mod tests;
