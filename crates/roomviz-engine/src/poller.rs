// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion poller.
//!
//! Parks while nothing is pending. Once a product is requested it checks
//! every pending composite once per interval, all lookups of a cycle running
//! concurrently, until the pending set drains again. Each result is applied
//! as soon as its own lookup returns.

use std::sync::Arc;

use futures::future::join_all;
use roomviz_core::{LookupOutcome, RoomvizError};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::{Action, Effect, PendingLookup};
use crate::visualizer::Core;

pub(crate) async fn run(core: Arc<Core>) {
    let period = core.settings.poll_interval;
    loop {
        while !core.has_pending() {
            tokio::select! {
                _ = core.wake.notified() => {}
                _ = core.cancel.cancelled() => {
                    info!("poller shutting down");
                    return;
                }
            }
        }

        debug!("composites pending, poller active");
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        while core.has_pending() {
            tokio::select! {
                _ = ticker.tick() => {
                    tokio::select! {
                        _ = poll_cycle(&core) => {}
                        _ = core.cancel.cancelled() => {
                            info!("poller shutting down mid-cycle");
                            return;
                        }
                    }
                }
                _ = core.cancel.cancelled() => {
                    info!("poller shutting down");
                    return;
                }
            }
        }
        debug!("no composites pending, poller parked");
    }
}

/// Runs one lookup per pending product, applying each result as it arrives.
///
/// Returns the number of lookups performed.
pub(crate) async fn poll_cycle(core: &Arc<Core>) -> usize {
    let lookups: Vec<PendingLookup> = core
        .apply(Action::PollTick)
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::LookUp(lookup) => Some(lookup),
            _ => None,
        })
        .collect();
    let count = lookups.len();

    join_all(lookups.into_iter().map(|lookup| {
        let core = Arc::clone(core);
        async move {
            let outcome = core
                .backend
                .generated_image_url(&lookup.photo_gs_url, &lookup.product_gs_url)
                .await;
            core.dispatch(outcome_action(lookup, outcome));
        }
    }))
    .await;
    count
}

fn outcome_action(lookup: PendingLookup, outcome: Result<LookupOutcome, RoomvizError>) -> Action {
    let PendingLookup {
        product_id, epoch, ..
    } = lookup;
    match outcome {
        Ok(LookupOutcome::Ready { public_url }) => Action::GenerationCompleted {
            product_id,
            epoch,
            public_url,
        },
        Ok(LookupOutcome::NotReady { status }) => Action::PollNotReady {
            product_id,
            epoch,
            status,
        },
        Err(e) => Action::PollErrored {
            product_id,
            epoch,
            reason: e.to_string(),
        },
    }
}
