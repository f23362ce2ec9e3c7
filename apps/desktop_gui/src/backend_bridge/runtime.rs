//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{execute, ContactsApi, HttpContactsApi};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(api_base_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let api: Arc<dyn ContactsApi> = Arc::new(HttpContactsApi::new(api_base_url));
    spawn_backend_thread(api, cmd_rx, ui_tx);
}

/// Each command runs as its own task so a slow request never blocks the ones behind it.
pub fn spawn_backend_thread(
    api: Arc<dyn ContactsApi>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendUnavailable(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            let mut tasks = Vec::new();
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Perform(request) => {
                        let api = Arc::clone(&api);
                        let ui_tx = ui_tx.clone();
                        tasks.push(tokio::spawn(async move {
                            let name = request.name();
                            let action = execute(api.as_ref(), request).await;
                            if ui_tx.send(UiEvent::Reconcile(action)).is_err() {
                                tracing::debug!(request = name, "ui closed before response arrived");
                            }
                        }));
                    }
                }
                tasks.retain(|task| !task.is_finished());
            }
            for task in tasks {
                let _ = task.await;
            }
        });
    })
}
