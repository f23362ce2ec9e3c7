//! HTTP access to the remote contact collection.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::ContactId,
    protocol::{Contact, ContactDraft},
};
use tracing::debug;
use url::Url;

/// The four calls the contact manager makes against the collection endpoint.
#[async_trait]
pub trait ContactsApi: Send + Sync {
    async fn list_contacts(&self) -> Result<Vec<Contact>>;
    async fn create_contact(&self, draft: &ContactDraft) -> Result<Contact>;
    async fn update_contact(&self, id: &ContactId, draft: &ContactDraft) -> Result<Contact>;
    async fn delete_contact(&self, id: &ContactId) -> Result<()>;
}

pub struct HttpContactsApi {
    http: Client,
    base_url: String,
}

impl HttpContactsApi {
    /// `base_url` is the service root; the collection lives at `{base_url}/users`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    /// Text ids are percent-encoded as a single path segment.
    fn contact_url(&self, id: &ContactId) -> String {
        let collection = self.collection_url();
        let Ok(mut url) = Url::parse(&collection) else {
            return format!("{collection}/{id}");
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url.into()
    }
}

#[async_trait]
impl ContactsApi for HttpContactsApi {
    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let url = self.collection_url();
        debug!(%url, "contacts: GET collection");
        let contacts = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to request {url}"))?
            .error_for_status()
            .context("list contacts was rejected")?
            .json::<Vec<Contact>>()
            .await
            .context("failed to decode contact list")?;
        Ok(contacts)
    }

    async fn create_contact(&self, draft: &ContactDraft) -> Result<Contact> {
        let url = self.collection_url();
        debug!(%url, "contacts: POST collection");
        let created = self
            .http
            .post(&url)
            .json(draft)
            .send()
            .await
            .with_context(|| format!("failed to request {url}"))?
            .error_for_status()
            .context("create contact was rejected")?
            .json::<Contact>()
            .await
            .context("failed to decode created contact")?;
        Ok(created)
    }

    async fn update_contact(&self, id: &ContactId, draft: &ContactDraft) -> Result<Contact> {
        let url = self.contact_url(id);
        debug!(%url, contact_id = %id, "contacts: PUT contact");
        let updated = self
            .http
            .put(&url)
            .json(draft)
            .send()
            .await
            .with_context(|| format!("failed to request {url}"))?
            .error_for_status()
            .context("update contact was rejected")?
            .json::<Contact>()
            .await
            .context("failed to decode updated contact")?;
        Ok(updated)
    }

    async fn delete_contact(&self, id: &ContactId) -> Result<()> {
        let url = self.contact_url(id);
        debug!(%url, contact_id = %id, "contacts: DELETE contact");
        self.http
            .delete(&url)
            .send()
            .await
            .with_context(|| format!("failed to request {url}"))?
            .error_for_status()
            .context("delete contact was rejected")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
