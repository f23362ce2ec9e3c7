//! In-memory `ContactsApi` used by store and manager tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicI64, Ordering},
        Mutex,
    },
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::ContactId,
    protocol::{Contact, ContactDraft},
};
use tokio::sync::oneshot;

use crate::transport::ContactsApi;

pub fn contact(id: i64, name: &str, email: &str, phone: &str) -> Contact {
    Contact::new(ContactId::from(id), name, email, phone)
}

pub struct FakeContactsApi {
    contacts: Mutex<Vec<Contact>>,
    next_id: AtomicI64,
    failing: Mutex<HashSet<&'static str>>,
    gates: Mutex<HashMap<&'static str, Vec<oneshot::Receiver<()>>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeContactsApi {
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let next_id = contacts
            .iter()
            .filter_map(|c| match c.id {
                ContactId::Number(n) => Some(n),
                ContactId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            contacts: Mutex::new(contacts),
            next_id: AtomicI64::new(next_id),
            failing: Mutex::new(HashSet::new()),
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Makes every later call of `operation` fail.
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().expect("failing lock").insert(operation);
    }

    /// Holds the next call of `operation` until the returned sender fires.
    pub fn hold(&self, operation: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .expect("gates lock")
            .entry(operation)
            .or_default()
            .push(rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    async fn enter(&self, operation: &'static str, detail: String) -> Result<()> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(format!("{operation} {detail}").trim_end().to_string());
        let gate = {
            let mut gates = self.gates.lock().expect("gates lock");
            gates.get_mut(operation).and_then(|pending| {
                if pending.is_empty() {
                    None
                } else {
                    Some(pending.remove(0))
                }
            })
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.failing.lock().expect("failing lock").contains(operation) {
            return Err(anyhow!("simulated network failure during {operation}"));
        }
        Ok(())
    }
}

#[async_trait]
impl ContactsApi for FakeContactsApi {
    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.enter("list", String::new()).await?;
        Ok(self.contacts.lock().expect("contacts lock").clone())
    }

    async fn create_contact(&self, draft: &ContactDraft) -> Result<Contact> {
        self.enter("create", draft.name.clone()).await?;
        let id = ContactId::from(self.next_id.fetch_add(1, Ordering::SeqCst));
        let created = Contact::new(id, &draft.name, &draft.email, &draft.phone);
        self.contacts
            .lock()
            .expect("contacts lock")
            .push(created.clone());
        Ok(created)
    }

    async fn update_contact(&self, id: &ContactId, draft: &ContactDraft) -> Result<Contact> {
        self.enter("update", id.to_string()).await?;
        let mut contacts = self.contacts.lock().expect("contacts lock");
        let existing = contacts
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| anyhow!("contact {id} not found"))?;
        existing.merge_draft(draft);
        Ok(existing.clone())
    }

    async fn delete_contact(&self, id: &ContactId) -> Result<()> {
        self.enter("delete", id.to_string()).await?;
        self.contacts
            .lock()
            .expect("contacts lock")
            .retain(|c| &c.id != id);
        Ok(())
    }
}
