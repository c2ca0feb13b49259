//! Backend worker: owns the tokio runtime and the product source, answers
//! each command with a `UiEvent`.

use std::{sync::Arc, thread};

use client_core::ProductSource;
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    source: Arc<dyn ProductSource>,
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
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                return;
            }
        };

        runtime.block_on(async move {
            // One task per command; the reconciler drops stale answers.
            while let Ok(cmd) = cmd_rx.recv() {
                let source = Arc::clone(&source);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    if let Some(event) = handle_command(source.as_ref(), cmd).await {
                        deliver(&ui_tx, event).await;
                    }
                });
            }
            tracing::info!("backend: command queue closed; worker exiting");
        });
    });
}

/// Hands an answer to the UI thread. A full queue is waited out off the
/// async workers so product answers are never lost.
pub(crate) async fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            tracing::warn!("backend: UI event queue is full; waiting for the UI to drain it");
            let ui_tx = ui_tx.clone();
            let sent = tokio::task::spawn_blocking(move || ui_tx.send(event).is_ok()).await;
            if !matches!(sent, Ok(true)) {
                tracing::debug!("backend: UI went away before the answer was delivered");
            }
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("backend: UI went away before the answer was delivered");
        }
    }
}

pub(crate) async fn handle_command(
    source: &dyn ProductSource,
    cmd: BackendCommand,
) -> Option<UiEvent> {
    match cmd {
        BackendCommand::FetchProducts(plan) => {
            tracing::debug!(seq = plan.seq, page = plan.page, "backend: fetch_products");
            let result = source.fetch_products(&plan.query).await.map_err(|err| {
                tracing::warn!(seq = plan.seq, "backend: fetch_products failed: {err}");
                UiError::from_source(UiErrorContext::Products, &err)
            });
            Some(UiEvent::ProductsFetched {
                seq: plan.seq,
                result,
            })
        }
        BackendCommand::FetchCategories => match source.fetch_categories().await {
            Ok(categories) => {
                tracing::info!(count = categories.len(), "backend: categories loaded");
                Some(UiEvent::CategoriesLoaded(categories))
            }
            Err(err) => {
                tracing::warn!("category lookup failed; leaving list empty: {err}");
                None
            }
        },
    }
}
