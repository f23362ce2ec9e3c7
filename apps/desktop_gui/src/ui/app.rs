use std::time::Duration;

use client_core::{ContactStore, PendingRequest, SubmitPolicy};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{domain::FormField, protocol::Contact};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{events::UiEvent, orchestration::dispatch_backend_command},
    ui::theme,
};

/// The contact form and list. The UI thread owns the store; the backend
/// worker only performs the HTTP calls handed to it.
pub struct ContactManagerApp {
    store: ContactStore,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
}

impl ContactManagerApp {
    pub fn new(policy: SubmitPolicy, cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            store: ContactStore::new(policy),
            cmd_tx,
            ui_rx,
            status: String::new(),
        };
        let load = app.store.begin_load();
        app.queue(load);
        app
    }

    fn queue(&mut self, request: PendingRequest) {
        dispatch_backend_command(&self.cmd_tx, BackendCommand::Perform(request), &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    tracing::debug!("{message}");
                }
                UiEvent::Reconcile(action) => {
                    self.store.apply(action);
                }
                UiEvent::BackendUnavailable(message) => {
                    self.status = message;
                }
            }
        }
    }

    fn submit(&mut self) {
        // Rejections are already logged by the store and stay invisible.
        if let Ok(request) = self.store.begin_submit() {
            self.queue(request);
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for field in FormField::ALL {
                let mut value = self.store.state().form.get(field).to_string();
                let edit = egui::TextEdit::singleline(&mut value)
                    .hint_text(field.placeholder())
                    .desired_width(200.0);
                if ui.add(edit).changed() {
                    self.store.update_field(field, value);
                }
            }

            let state = self.store.state();
            let button = egui::Button::new(
                egui::RichText::new(state.submit_label())
                    .strong()
                    .color(theme::SUBMIT_TEXT),
            )
            .fill(theme::submit_fill(state.edit.is_editing()));
            if ui.add(button).clicked() {
                self.submit();
            }
        });
    }

    fn show_contacts(&mut self, ui: &mut egui::Ui) {
        let mut edit_clicked: Option<Contact> = None;
        let mut delete_clicked = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            for contact in &self.store.state().contacts {
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "{} - {} - {}",
                        contact.name, contact.email, contact.phone
                    ));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let delete = egui::Button::new(
                            egui::RichText::new("Delete").color(egui::Color32::WHITE),
                        )
                        .fill(theme::DELETE_BUTTON_FILL);
                        if ui.add(delete).clicked() {
                            delete_clicked = Some(contact.id.clone());
                        }
                        let update = egui::Button::new(
                            egui::RichText::new("Update").color(egui::Color32::WHITE),
                        )
                        .fill(theme::UPDATE_BUTTON_FILL);
                        if ui.add(update).clicked() {
                            edit_clicked = Some(contact.clone());
                        }
                    });
                });
                ui.separator();
            }
        });

        if let Some(contact) = edit_clicked {
            self.store.enter_edit(&contact);
        }
        if let Some(id) = delete_clicked {
            let request = self.store.begin_delete(id);
            self.queue(request);
        }
    }
}

impl eframe::App for ContactManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(egui::RichText::new("Contact List").strong().size(28.0));
            ui.add_space(12.0);
            self.show_form(ui);
            if !self.status.is_empty() {
                ui.small(egui::RichText::new(&self.status).weak());
            }
            ui.add_space(12.0);
            self.show_contacts(ui);
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
