// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application state store: typed actions applied by a synchronous reducer.
//!
//! Every transition goes through [`AppState::reduce`], which never performs
//! I/O. Work that has to leave the process comes back as [`Effect`]s for the
//! runtime to execute; their results re-enter as further actions.
//!
//! Generation entries live in one map keyed by product id, so a product can
//! never be pending and completed at the same time. Transitions are
//! `Requested -> Completed` and `Requested -> Failed`; a failed product may be
//! requested again by selecting it.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use roomviz_core::{PhotoHandle, Product, ProductId};
use tracing::{debug, info, warn};

/// Advisory shown while the selected product's composite is not ready.
pub const STILL_GENERATING_ADVISORY: &str = "Still generating your new room...";

/// Progress of one product's composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    /// Trigger sent (or about to be); waiting for the backend to report readiness.
    Requested,
    /// Composite available at `public_url`.
    Completed { public_url: String },
    /// Trigger rejected or polling gave up.
    Failed { reason: String },
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationState::Requested => write!(f, "generating"),
            GenerationState::Completed { .. } => write!(f, "completed"),
            GenerationState::Failed { .. } => write!(f, "failed"),
        }
    }
}

/// Tracking record for one requested product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationEntry {
    /// The product being composited into the room.
    pub product: Product,
    /// Where the composite currently stands.
    pub state: GenerationState,
    /// Poll attempts that did not complete the entry.
    pub attempts: u32,
    /// Photo epoch the entry was created under.
    pub epoch: u64,
}

/// One readiness check the poller has to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    /// Product whose composite is checked.
    pub product_id: ProductId,
    /// Storage URL of the room photo the composite was requested for.
    pub photo_gs_url: String,
    /// Storage URL of the product image.
    pub product_gs_url: String,
    /// Photo epoch the lookup belongs to; echoed back with the result.
    pub epoch: u64,
}

/// Everything that can happen to the application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A new room photo is being uploaded.
    ///
    /// The photo epoch after this action identifies the upload; its result
    /// must carry that epoch.
    UploadStarted,
    /// The upload started under `epoch` finished. Ignored if another upload
    /// or a clear happened since.
    PhotoUploaded { handle: PhotoHandle, epoch: u64 },
    /// The upload started under `epoch` failed.
    UploadFailed { epoch: u64, reason: String },
    /// The user dismissed the current photo.
    PhotoCleared,
    /// The user focused a product; requests generation when it is new.
    ProductSelected(Product),
    /// Request generation without changing the selection.
    GenerationRequested(Product),
    /// The backend accepted the generation request.
    TriggerAccepted { product_id: ProductId, epoch: u64 },
    /// The generation request could not be delivered or was rejected.
    TriggerFailed { product_id: ProductId, epoch: u64, reason: String },
    /// Start of a poll cycle; yields one lookup per pending product.
    PollTick,
    /// Lookup answered with a non-success status.
    PollNotReady { product_id: ProductId, epoch: u64, status: u16 },
    /// Lookup failed in transport or decoding.
    PollErrored { product_id: ProductId, epoch: u64, reason: String },
    /// Lookup returned the composite URL.
    GenerationCompleted { product_id: ProductId, epoch: u64, public_url: String },
    /// The advisory timer elapsed.
    AdvisoryExpired,
}

/// Side effects requested by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the backend to generate one composite.
    TriggerGeneration {
        store_id: String,
        photo_gs_url: String,
        product_id: ProductId,
        epoch: u64,
    },
    /// Check whether a composite is ready. Only produced by [`Action::PollTick`].
    LookUp(PendingLookup),
    /// A product became pending; the poller may be parked.
    WakePoller,
    /// Clear the advisory after the configured delay.
    ScheduleAdvisoryClear,
}

/// The single source of truth for photo, selection and generation progress.
#[derive(Debug, Clone)]
pub struct AppState {
    photo: Option<PhotoHandle>,
    upload_in_flight: bool,
    photo_epoch: u64,
    selected: Option<Product>,
    store_id: Option<String>,
    generations: HashMap<ProductId, GenerationEntry>,
    advisory: Option<String>,
    max_attempts: u32,
}

impl AppState {
    /// `store_id` gates generation requests; `max_attempts` bounds polling per product.
    pub fn new(store_id: Option<String>, max_attempts: u32) -> Self {
        Self {
            photo: None,
            upload_in_flight: false,
            photo_epoch: 0,
            selected: None,
            store_id,
            generations: HashMap::new(),
            advisory: None,
            max_attempts: max_attempts.max(1),
        }
    }

    /// The active room photo, if an upload has completed.
    pub fn photo(&self) -> Option<&PhotoHandle> {
        self.photo.as_ref()
    }

    pub fn upload_in_flight(&self) -> bool {
        self.upload_in_flight
    }

    /// Bumped whenever the photo changes or is being replaced.
    pub fn photo_epoch(&self) -> u64 {
        self.photo_epoch
    }

    pub fn selected(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    /// Transient message for the user.
    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    pub fn entry(&self, product_id: &ProductId) -> Option<&GenerationEntry> {
        self.generations.get(product_id)
    }

    /// All entries, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &GenerationEntry> {
        self.generations.values()
    }

    /// Products whose composite is still pending.
    pub fn generating(&self) -> BTreeSet<ProductId> {
        self.ids_where(|s| matches!(s, GenerationState::Requested))
    }

    /// Products with a ready composite.
    pub fn completed(&self) -> BTreeSet<ProductId> {
        self.ids_where(|s| matches!(s, GenerationState::Completed { .. }))
    }

    /// Products whose generation was rejected or timed out.
    pub fn failed(&self) -> BTreeSet<ProductId> {
        self.ids_where(|s| matches!(s, GenerationState::Failed { .. }))
    }

    pub fn has_pending(&self) -> bool {
        self.generations
            .values()
            .any(|e| e.state == GenerationState::Requested)
    }

    /// Whether every entry reached a terminal state.
    pub fn is_settled(&self) -> bool {
        !self.has_pending()
    }

    fn ids_where(&self, pred: impl Fn(&GenerationState) -> bool) -> BTreeSet<ProductId> {
        self.generations
            .iter()
            .filter(|(_, e)| pred(&e.state))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn is_selected(&self, product_id: &ProductId) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|p| &p.product_id == product_id)
    }

    /// Applies `action` and returns the effects it requires.
    pub fn reduce(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::UploadStarted => {
                self.invalidate("photo upload started");
                self.photo = None;
                self.upload_in_flight = true;
                Vec::new()
            }
            Action::PhotoUploaded { handle, epoch } => {
                if epoch != self.photo_epoch {
                    debug!(gs_url = %handle.gs_url, "superseded photo upload ignored");
                    return Vec::new();
                }
                self.invalidate("new photo uploaded");
                info!(gs_url = %handle.gs_url, "room photo uploaded");
                self.photo = Some(handle);
                self.upload_in_flight = false;
                // A product picked before the photo existed gets its composite now.
                match self.selected.clone() {
                    Some(product) => self.request_generation(product),
                    None => Vec::new(),
                }
            }
            Action::UploadFailed { epoch, reason } => {
                if epoch != self.photo_epoch {
                    debug!(reason = %reason, "superseded photo upload failure ignored");
                    return Vec::new();
                }
                warn!(reason = %reason, "room photo upload failed");
                self.invalidate("photo upload failed");
                self.photo = None;
                self.upload_in_flight = false;
                Vec::new()
            }
            Action::PhotoCleared => {
                self.invalidate("photo cleared");
                self.photo = None;
                self.upload_in_flight = false;
                Vec::new()
            }
            Action::ProductSelected(product) => {
                debug!(product_id = %product.product_id, "product selected");
                self.selected = Some(product.clone());
                self.request_generation(product)
            }
            Action::GenerationRequested(product) => self.request_generation(product),
            Action::TriggerAccepted { product_id, epoch } => {
                match self.current_entry(&product_id, epoch) {
                    Some(entry) if entry.state == GenerationState::Requested => {
                        debug!(product_id = %product_id, "generation request accepted");
                    }
                    _ => debug!(product_id = %product_id, "stale generation acknowledgement ignored"),
                }
                Vec::new()
            }
            Action::TriggerFailed {
                product_id,
                epoch,
                reason,
            } => self.trigger_failed(product_id, epoch, reason),
            Action::PollTick => self.poll_tick(),
            Action::PollNotReady {
                product_id,
                epoch,
                status,
            } => self.poll_missed(product_id, epoch, format!("backend answered {status}"), true),
            Action::PollErrored {
                product_id,
                epoch,
                reason,
            } => {
                warn!(product_id = %product_id, reason = %reason, "generation lookup failed");
                self.poll_missed(product_id, epoch, reason, false)
            }
            Action::GenerationCompleted {
                product_id,
                epoch,
                public_url,
            } => {
                match self.current_entry_mut(&product_id, epoch) {
                    Some(entry) if entry.state == GenerationState::Requested => {
                        info!(product_id = %product_id, url = %public_url, "composite ready");
                        entry.state = GenerationState::Completed { public_url };
                    }
                    _ => debug!(product_id = %product_id, "late completion ignored"),
                }
                Vec::new()
            }
            Action::AdvisoryExpired => {
                self.advisory = None;
                Vec::new()
            }
        }
    }

    fn request_generation(&mut self, product: Product) -> Vec<Effect> {
        let Some(photo_gs_url) = self.photo.as_ref().map(|p| p.gs_url.clone()) else {
            debug!(product_id = %product.product_id, "no room photo yet, generation not requested");
            return Vec::new();
        };
        let Some(store_id) = self.store_id.clone() else {
            warn!(product_id = %product.product_id, "no store id configured, generation not requested");
            return Vec::new();
        };

        let product_id = product.product_id.clone();
        match self.generations.get(&product_id).map(|e| &e.state) {
            Some(GenerationState::Requested | GenerationState::Completed { .. }) => {
                debug!(product_id = %product_id, "generation already tracked");
                return Vec::new();
            }
            Some(GenerationState::Failed { .. }) => {
                info!(product_id = %product_id, "retrying failed generation");
            }
            None => {}
        }

        self.generations.insert(
            product_id.clone(),
            GenerationEntry {
                product,
                state: GenerationState::Requested,
                attempts: 0,
                epoch: self.photo_epoch,
            },
        );
        vec![
            Effect::TriggerGeneration {
                store_id,
                photo_gs_url,
                product_id,
                epoch: self.photo_epoch,
            },
            Effect::WakePoller,
        ]
    }

    fn trigger_failed(&mut self, product_id: ProductId, epoch: u64, reason: String) -> Vec<Effect> {
        let Some(entry) = self.current_entry_mut(&product_id, epoch) else {
            debug!(product_id = %product_id, "trigger failure for discarded entry ignored");
            return Vec::new();
        };
        if entry.state != GenerationState::Requested {
            debug!(product_id = %product_id, state = %entry.state, "stale trigger failure ignored");
            return Vec::new();
        }

        warn!(product_id = %product_id, reason = %reason, "generation request rejected");
        let name = entry.product.display_name().to_string();
        entry.state = GenerationState::Failed {
            reason: format!("generation request rejected: {reason}"),
        };
        if self.is_selected(&product_id) {
            self.show_advisory(format!("Could not start generating {name}"))
        } else {
            Vec::new()
        }
    }

    fn poll_tick(&mut self) -> Vec<Effect> {
        let Some(photo) = &self.photo else {
            return Vec::new();
        };
        let mut lookups: Vec<_> = self
            .generations
            .iter()
            .filter(|(_, e)| e.state == GenerationState::Requested && e.epoch == self.photo_epoch)
            .map(|(id, e)| PendingLookup {
                product_id: id.clone(),
                photo_gs_url: photo.gs_url.clone(),
                product_gs_url: e.product.image_gs_url.clone(),
                epoch: e.epoch,
            })
            .collect();
        lookups.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        lookups.into_iter().map(Effect::LookUp).collect()
    }

    fn poll_missed(
        &mut self,
        product_id: ProductId,
        epoch: u64,
        reason: String,
        not_ready: bool,
    ) -> Vec<Effect> {
        let max_attempts = self.max_attempts;
        let selected = self.is_selected(&product_id);
        let Some(entry) = self.current_entry_mut(&product_id, epoch) else {
            return Vec::new();
        };
        if entry.state != GenerationState::Requested {
            return Vec::new();
        }

        entry.attempts += 1;
        if entry.attempts >= max_attempts {
            warn!(
                product_id = %product_id,
                attempts = entry.attempts,
                last = %reason,
                "giving up on composite"
            );
            let name = entry.product.display_name().to_string();
            entry.state = GenerationState::Failed {
                reason: format!("not ready after {} attempts ({reason})", entry.attempts),
            };
            return if selected {
                self.show_advisory(format!("Generating {name} is taking too long, please try again"))
            } else {
                Vec::new()
            };
        }

        debug!(product_id = %product_id, attempts = entry.attempts, "composite not ready");
        if not_ready && selected && self.advisory.is_none() {
            self.show_advisory(STILL_GENERATING_ADVISORY.to_string())
        } else {
            Vec::new()
        }
    }

    fn show_advisory(&mut self, message: String) -> Vec<Effect> {
        self.advisory = Some(message);
        vec![Effect::ScheduleAdvisoryClear]
    }

    /// Drops every generation entry; results tagged with the old epoch are ignored.
    fn invalidate(&mut self, why: &str) {
        if !self.generations.is_empty() {
            info!(entries = self.generations.len(), why, "discarding generations for previous photo");
        }
        self.generations.clear();
        self.photo_epoch += 1;
    }

    fn current_entry(&self, product_id: &ProductId, epoch: u64) -> Option<&GenerationEntry> {
        if epoch != self.photo_epoch {
            return None;
        }
        self.generations.get(product_id)
    }

    fn current_entry_mut(&mut self, product_id: &ProductId, epoch: u64) -> Option<&mut GenerationEntry> {
        if epoch != self.photo_epoch {
            return None;
        }
        self.generations.get_mut(product_id)
    }
}
