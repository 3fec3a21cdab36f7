//! Backend worker thread: owns the tokio runtime the submits run on.

use std::{sync::Arc, thread};

use client_core::{CredentialClient, Outcome};
use crossbeam_channel::{Receiver, Sender, TrySendError};

pub enum BackendCommand {
    SubmitSave,
    SubmitLookup,
}

pub enum UiEvent {
    Settled(Outcome),
    BackendFailed(String),
}

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::SubmitSave => "submit_save",
        BackendCommand::SubmitLookup => "submit_lookup",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "Command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker disconnected; restart the app".to_string();
        }
    }
}

pub fn spawn_backend_thread(
    client: Arc<CredentialClient>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "failed to build backend runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let outcome = match cmd {
                    BackendCommand::SubmitSave => client.submit_save().await,
                    BackendCommand::SubmitLookup => client.submit_lookup().await,
                };
                let _ = ui_tx.try_send(UiEvent::Settled(outcome));
            }
        });
    });
}
