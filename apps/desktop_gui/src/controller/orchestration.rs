//! Command orchestration: commits user intent through the reconciler, mirrors
//! the settled state into the location and queues the resulting fetch.

use client_core::{DashboardLocation, FetchOutcome, Settlement, StateReconciler};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), UiError> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err(UiError::from_message(
            UiErrorContext::General,
            "UI command queue is full; please retry",
        )),
        Err(TrySendError::Disconnected(_)) => Err(UiError::from_message(
            UiErrorContext::General,
            "Backend command processor disconnected; restart the dashboard",
        )),
    }
}

/// UI-thread owner of the dashboard state. Nothing here blocks: fetches are
/// queued to the backend worker and their answers come back as `UiEvent`s.
pub struct DashboardController {
    cmd_tx: Sender<BackendCommand>,
    reconciler: StateReconciler,
    location: DashboardLocation,
    banner: Option<UiError>,
    mounted: bool,
}

impl DashboardController {
    pub fn new(cmd_tx: Sender<BackendCommand>, location: DashboardLocation, page_size: u32) -> Self {
        Self {
            cmd_tx,
            reconciler: StateReconciler::new(location.hydrate(), page_size),
            location,
            banner: None,
            mounted: false,
        }
    }

    /// Requests the category list and the hydrated page. Only the first call
    /// does anything.
    pub fn mount(&mut self) -> Settlement {
        if self.mounted {
            return Settlement::default();
        }
        self.mounted = true;
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, BackendCommand::FetchCategories) {
            self.banner = Some(err);
        }
        self.commit(StateReconciler::mount)
    }

    pub fn commit(
        &mut self,
        change: impl FnOnce(&mut StateReconciler) -> Settlement,
    ) -> Settlement {
        let settlement = change(&mut self.reconciler);
        if !settlement.passes.is_empty() {
            self.location.push(self.reconciler.state());
        }

        if let Some(plan) = settlement.fetch.clone() {
            let seq = plan.seq;
            if let Err(err) =
                dispatch_backend_command(&self.cmd_tx, BackendCommand::FetchProducts(plan))
            {
                // Never queued, so nothing will answer it.
                self.reconciler.apply_fetch_result(seq, Err(&err));
                self.banner = Some(err);
            }
        }
        settlement
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::ProductsFetched { seq, result } => {
                if self.reconciler.apply_fetch_result(seq, result) == FetchOutcome::Applied {
                    tracing::info!(
                        seq,
                        total = self.reconciler.results().total_products,
                        "dashboard results updated"
                    );
                }
            }
            UiEvent::CategoriesLoaded(categories) => self.reconciler.set_categories(categories),
            UiEvent::Error(err) => {
                tracing::error!(context = ?err.context(), "{err}");
                self.banner = Some(err);
            }
        }
    }

    pub fn reconciler(&self) -> &StateReconciler {
        &self.reconciler
    }

    pub fn location(&self) -> &DashboardLocation {
        &self.location
    }

    pub fn banner(&self) -> Option<&UiError> {
        self.banner.as_ref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }
}
