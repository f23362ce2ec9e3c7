use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    settings::normalize_api_base_url, ActionOutcome, ContactManager, HttpContactsApi,
};
use shared::{
    domain::{ContactId, FormField},
    protocol::Contact,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "contacts", about = "Manage contacts on the remote contact collection")]
struct Args {
    /// Service root; overrides `api_base_url` from contacts.toml and the environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Print the resulting contact list as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the contact list.
    List,
    /// Create a contact.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
    /// Edit a loaded contact; omitted fields keep their current value.
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a contact.
    Delete {
        #[arg(long)]
        id: String,
    },
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(command: &str, outcome: ActionOutcome) {
    match outcome {
        ActionOutcome::Applied => info!(command, "contacts: done"),
        ActionOutcome::ReconciledAfterFailure => eprintln!(
            "{command}: remote update failed; the local list was updated anyway"
        ),
        ActionOutcome::Failed => eprintln!("{command}: request failed; nothing changed"),
        ActionOutcome::Discarded => eprintln!(
            "{command}: contact created remotely but not added (every field needs more than 3 characters)"
        ),
        ActionOutcome::Superseded => eprintln!("{command}: response arrived too late and was ignored"),
    }
}

/// Finds a loaded id by its printed form, so `7` matches a numeric id and
/// `a1b2` a text one.
fn resolve_id(contacts: &[Contact], raw: &str) -> Option<ContactId> {
    contacts
        .iter()
        .map(|contact| &contact.id)
        .find(|id| id.to_string() == raw)
        .cloned()
}

fn print_contacts(contacts: &[Contact], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(contacts)?);
        return Ok(());
    }
    for contact in contacts {
        println!(
            "{}: {} - {} - {}",
            contact.id, contact.name, contact.email, contact.phone
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = client_core::load_settings()?;
    if let Some(url) = &args.api_url {
        settings.api_base_url = normalize_api_base_url(url)?;
    }
    init_tracing(&settings.log_filter);
    settings.log_diagnostics();
    info!(api = %settings.api_base_url, "contacts: using remote collection");

    let api = Arc::new(HttpContactsApi::new(settings.api_base_url.clone()));
    let manager = ContactManager::new(api, settings.submit_policy());
    if let Some(outcome) = manager.activate().await {
        report("load", outcome);
    }

    match args.command {
        Command::List => {}
        Command::Add { name, email, phone } => {
            manager.update_field(FormField::Name, name).await;
            manager.update_field(FormField::Email, email).await;
            manager.update_field(FormField::Phone, phone).await;
            let outcome = manager.submit().await?;
            report("add", outcome);
        }
        Command::Update {
            id,
            name,
            email,
            phone,
        } => {
            let state = manager.snapshot().await;
            let Some(contact) = resolve_id(&state.contacts, &id)
                .and_then(|id| state.contact(&id).cloned())
            else {
                eprintln!("update: contact {id} is not in the loaded list; nothing changed");
                return print_contacts(&state.contacts, args.json);
            };
            manager.enter_edit(&contact).await;
            for (field, value) in [
                (FormField::Name, name),
                (FormField::Email, email),
                (FormField::Phone, phone),
            ] {
                if let Some(value) = value {
                    manager.update_field(field, value).await;
                }
            }
            let outcome = manager.submit().await?;
            report("update", outcome);
        }
        Command::Delete { id } => {
            let contacts = manager.snapshot().await.contacts;
            let id = resolve_id(&contacts, &id)
                .unwrap_or_else(|| id.parse::<ContactId>().unwrap_or_else(|never| match never {}));
            let outcome = manager.delete(id).await;
            report("delete", outcome);
        }
    }

    print_contacts(&manager.snapshot().await.contacts, args.json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_update_with_partial_fields() {
        let args = Args::try_parse_from([
            "contacts", "update", "--id", "3", "--phone", "555-0100", "--json",
        ])
        .expect("parse args");

        assert!(args.json);
        match args.command {
            Command::Update {
                id, name, phone, ..
            } => {
                assert_eq!(id, "3");
                assert_eq!(name, None);
                assert_eq!(phone.as_deref(), Some("555-0100"));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn resolves_numeric_and_text_ids_by_printed_form() {
        let contacts = vec![
            Contact::new(
                ContactId::from(7),
                "Kurtis Weissnat",
                "Telly.Hoeger@billy.biz",
                "210.067.6132",
            ),
            Contact::new(ContactId::from("a1b2"), "John", "j@x.com", "5551234"),
        ];

        assert_eq!(resolve_id(&contacts, "7"), Some(ContactId::from(7)));
        assert_eq!(resolve_id(&contacts, "a1b2"), Some(ContactId::from("a1b2")));
        assert_eq!(resolve_id(&contacts, "404"), None);
    }

    #[test]
    fn add_requires_all_fields() {
        assert!(Args::try_parse_from(["contacts", "add", "--name", "John"]).is_err());
    }
}
