//! Runtime bridge between UI command queue and backend event intake.
//!
//! The worker thread owns a tokio runtime and the catalog client. Each command
//! runs as its own task, so a slow request never holds up the ones queued
//! behind it; completions may therefore arrive out of order and the
//! controller sorts that out.

use std::{sync::Arc, thread};

use client_core::{BookClient, CatalogApi};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(api_base_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let startup_tx = ui_tx.clone();
    let spawned = thread::Builder::new()
        .name("backend-worker".to_string())
        .spawn(move || run_worker(api_base_url, cmd_rx, ui_tx));
    if let Err(err) = spawned {
        tracing::error!("failed to spawn backend worker thread: {err}");
        forward(
            &startup_tx,
            UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: {err}"),
            )),
        );
    }
}

fn run_worker(api_base_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to build backend runtime: {err}");
            forward(
                &ui_tx,
                UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )),
            );
            return;
        }
    };

    let api: Arc<dyn CatalogApi> = match BookClient::new(&api_base_url) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            tracing::error!(api_base_url = %api_base_url, "failed to configure catalog client: {err}");
            forward(
                &ui_tx,
                UiEvent::Error(UiError::from_client_error(
                    UiErrorContext::BackendStartup,
                    &err,
                )),
            );
            return;
        }
    };
    tracing::info!(api_base_url = %api_base_url, "backend worker ready");
    forward(&ui_tx, UiEvent::Info("Loading books...".to_string()));

    runtime.block_on(async move {
        while let Ok(cmd) = cmd_rx.recv() {
            let api = Arc::clone(&api);
            let ui_tx = ui_tx.clone();
            tokio::spawn(async move {
                let event = execute(api.as_ref(), cmd).await;
                forward(&ui_tx, event);
            });
        }
        tracing::debug!("ui command queue closed; backend worker stopping");
    });
}

/// Runs one command against the catalog and maps the outcome to the event
/// the controller expects.
pub async fn execute(api: &dyn CatalogApi, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::FetchBooks { generation } => match api.list_books().await {
            Ok(books) => UiEvent::BooksLoaded { generation, books },
            Err(err) => UiEvent::Error(UiError::from_client_error(UiErrorContext::Refresh, &err)),
        },
        BackendCommand::CreateBook { book } => match api.create_book(&book).await {
            Ok(book) => UiEvent::BookSaved { book },
            Err(err) => UiEvent::Error(UiError::from_client_error(UiErrorContext::Save, &err)),
        },
        BackendCommand::UpdateBook { id, book } => match api.update_book(&id, &book).await {
            Ok(book) => UiEvent::BookSaved { book },
            Err(err) => UiEvent::Error(UiError::from_client_error(UiErrorContext::Save, &err)),
        },
        BackendCommand::DeleteBook { id } => match api.delete_book(&id).await {
            Ok(_) => UiEvent::BookDeleted { id },
            Err(err) => UiEvent::Error(UiError::from_client_error(UiErrorContext::Delete, &err)),
        },
    }
}

/// Completions that arrive after the window closed are dropped here rather
/// than applied to a UI that no longer exists.
fn forward(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            tracing::warn!("backend->ui event queue is full; dropping event");
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("ui is gone; dropping late backend completion");
        }
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
