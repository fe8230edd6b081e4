// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The visualizer runtime.
//!
//! [`Visualizer`] owns the [`AppState`], applies actions to it, executes the
//! resulting effects as tokio tasks and publishes the derived [`ViewState`]
//! after every transition. The completion poller runs as one background task
//! for the lifetime of the visualizer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use roomviz_config::RoomvizConfig;
use roomviz_core::{
    PhotoHandle, PhotoUpload, Product, ProductId, RoomvizError, VisualizerBackend,
};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::poller;
use crate::reconciler::{self, ViewState};
use crate::state::{Action, AppState, Effect, GenerationEntry};

/// Runtime knobs, usually taken from `[store]` and `[polling]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Required for generation; without it selections never trigger.
    pub store_id: Option<String>,
    /// Time between poll cycles.
    pub poll_interval: Duration,
    /// Poll attempts per product before it is marked failed.
    pub max_attempts: u32,
    /// How long an advisory stays visible.
    pub advisory_clear: Duration,
}

impl EngineSettings {
    /// Reads the engine knobs out of a loaded configuration.
    pub fn from_config(config: &RoomvizConfig) -> Self {
        Self {
            store_id: config.store.selector().store_id().map(str::to_owned),
            poll_interval: config.polling.interval(),
            max_attempts: config.polling.max_attempts,
            advisory_clear: config.polling.advisory_clear(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            store_id: None,
            poll_interval: Duration::from_secs(1),
            max_attempts: 120,
            advisory_clear: Duration::from_secs(2),
        }
    }
}

/// State shared between the handle, the poller and effect tasks.
pub(crate) struct Core {
    pub(crate) backend: Arc<dyn VisualizerBackend>,
    state: Mutex<AppState>,
    view_tx: watch::Sender<ViewState>,
    pub(crate) wake: Notify,
    pub(crate) cancel: CancellationToken,
    pub(crate) settings: EngineSettings,
}

impl Core {
    fn lock(&self) -> MutexGuard<'_, AppState> {
        // The reducer never panics mid-transition, so a poisoned state is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reduces `action` and publishes the new view. Effects are returned unexecuted.
    pub(crate) fn apply(&self, action: Action) -> Vec<Effect> {
        self.transition(action).0
    }

    /// Like [`Core::apply`], also returning the photo epoch right after the transition.
    fn transition(&self, action: Action) -> (Vec<Effect>, u64) {
        let (effects, epoch, view) = {
            let mut state = self.lock();
            let effects = state.reduce(action);
            (effects, state.photo_epoch(), reconciler::derive(&state))
        };
        self.view_tx.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
        (effects, epoch)
    }

    /// Reduces `action` and executes its effects.
    pub(crate) fn dispatch(self: &Arc<Self>, action: Action) {
        let effects = self.apply(action);
        self.execute(effects);
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.lock().has_pending()
    }

    fn execute(self: &Arc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::TriggerGeneration {
                    store_id,
                    photo_gs_url,
                    product_id,
                    epoch,
                } => {
                    let core = Arc::clone(self);
                    tokio::spawn(async move {
                        let ids = [product_id.clone()];
                        let result = core
                            .backend
                            .trigger_generation(&store_id, &photo_gs_url, &ids)
                            .await;
                        let action = match result {
                            Ok(()) => Action::TriggerAccepted { product_id, epoch },
                            Err(e) => Action::TriggerFailed {
                                product_id,
                                epoch,
                                reason: e.to_string(),
                            },
                        };
                        core.dispatch(action);
                    });
                }
                Effect::WakePoller => self.wake.notify_one(),
                Effect::ScheduleAdvisoryClear => {
                    let core = Arc::clone(self);
                    let delay = self.settings.advisory_clear;
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = tokio::time::sleep(delay) => core.dispatch(Action::AdvisoryExpired),
                            _ = core.cancel.cancelled() => {}
                        }
                    });
                }
                Effect::LookUp(lookup) => {
                    // Lookups are only produced by PollTick, which the poller applies itself.
                    debug!(product_id = %lookup.product_id, "lookup effect outside a poll cycle dropped");
                }
            }
        }
    }
}

/// Handle to a running visualizer. Dropping it stops the poller.
///
/// The visualizer runs on a child of the token passed to [`Visualizer::start`],
/// so stopping it never cancels the caller's token.
pub struct Visualizer {
    core: Arc<Core>,
    poller: Option<JoinHandle<()>>,
}

impl Visualizer {
    /// Starts the visualizer and its poller on the current tokio runtime.
    ///
    /// Cancelling `cancel` tears down the poller and pending advisory timers.
    pub fn start(
        backend: Arc<dyn VisualizerBackend>,
        settings: EngineSettings,
        cancel: CancellationToken,
    ) -> Self {
        let state = AppState::new(settings.store_id.clone(), settings.max_attempts);
        let (view_tx, _) = watch::channel(reconciler::derive(&state));
        let core = Arc::new(Core {
            backend,
            state: Mutex::new(state),
            view_tx,
            wake: Notify::new(),
            cancel: cancel.child_token(),
            settings,
        });
        let poller = tokio::spawn(poller::run(Arc::clone(&core)));
        info!(
            interval_ms = core.settings.poll_interval.as_millis() as u64,
            max_attempts = core.settings.max_attempts,
            store_id = core.settings.store_id.as_deref().unwrap_or("-"),
            "visualizer started"
        );
        Self {
            core,
            poller: Some(poller),
        }
    }

    /// Uploads a room photo, replacing the current one.
    ///
    /// Generations for the previous photo are discarded as soon as the upload
    /// starts. On failure the photo is reset and the error returned. When
    /// another upload starts before this one finishes, the later upload wins
    /// and this result is not applied, though it is still returned.
    pub async fn upload_photo(&self, upload: PhotoUpload) -> Result<PhotoHandle, RoomvizError> {
        let (effects, epoch) = self.core.transition(Action::UploadStarted);
        self.core.execute(effects);
        match self.core.backend.upload_image(upload).await {
            Ok(handle) => {
                self.core.dispatch(Action::PhotoUploaded {
                    handle: handle.clone(),
                    epoch,
                });
                Ok(handle)
            }
            Err(e) => {
                self.core.dispatch(Action::UploadFailed {
                    epoch,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Forgets the current photo and every generation tied to it.
    pub fn clear_photo(&self) {
        self.core.dispatch(Action::PhotoCleared);
    }

    /// Focuses `product`, requesting its composite unless already tracked.
    pub fn select_product(&self, product: Product) {
        self.core.dispatch(Action::ProductSelected(product));
    }

    /// Requests a composite without changing the selection.
    pub fn request_generation(&self, product: Product) {
        self.core.dispatch(Action::GenerationRequested(product));
    }

    /// The current view.
    pub fn view(&self) -> ViewState {
        self.core.view_tx.borrow().clone()
    }

    /// Receiver notified after every view change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.core.view_tx.subscribe()
    }

    /// A copy of the full application state.
    pub fn snapshot(&self) -> AppState {
        self.core.lock().clone()
    }

    /// A copy of one product's generation entry.
    pub fn entry(&self, product_id: &ProductId) -> Option<GenerationEntry> {
        self.core.lock().entry(product_id).cloned()
    }

    /// Waits until no composite is pending or the visualizer is cancelled.
    pub async fn settled(&self) -> ViewState {
        let mut rx = self.subscribe();
        tokio::select! {
            result = rx.wait_for(|view| view.pending == 0) => {
                if result.is_err() {
                    warn!("view channel closed while waiting for composites");
                }
            }
            _ = self.core.cancel.cancelled() => {
                debug!("wait for composites interrupted by shutdown");
            }
        }
        self.view()
    }

    /// Whether the visualizer was stopped or its parent token cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.core.cancel.is_cancelled()
    }

    /// Stops the poller and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.core.cancel.cancel();
        if let Some(handle) = self.poller.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "poller task ended abnormally");
            }
        }
        info!("visualizer stopped");
    }
}

impl Drop for Visualizer {
    fn drop(&mut self) {
        self.core.cancel.cancel();
    }
}
