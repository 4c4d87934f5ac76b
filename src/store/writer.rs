// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background writes to a position store.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::event::CoveringId;

use super::{PositionStore, StoreKey};

/// Write-behind queue in front of a [`PositionStore`] for one covering.
///
/// `write` never blocks. A background task drains the queue, keeps only the
/// latest value per key when writes pile up, and runs the actual store calls
/// on the blocking pool. Failures are logged. The task ends once every
/// handle to the queue is dropped, after flushing what was queued.
#[derive(Debug, Clone)]
pub(crate) struct StoreWriter {
    covering_id: CoveringId,
    tx: mpsc::UnboundedSender<(StoreKey, u8)>,
}

impl StoreWriter {
    /// Spawns the write task for a covering.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn(
        covering_id: CoveringId,
        namespace: String,
        store: Arc<dyn PositionStore>,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<(StoreKey, u8)>();
        let namespace: Arc<str> = Arc::from(namespace);

        tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut batch = vec![first];
                while let Ok((key, value)) = rx.try_recv() {
                    match batch.iter_mut().find(|(k, _)| *k == key) {
                        Some(slot) => slot.1 = value,
                        None => batch.push((key, value)),
                    }
                }

                let store = Arc::clone(&store);
                let ns = Arc::clone(&namespace);
                let written = tokio::task::spawn_blocking(move || {
                    for (key, value) in batch {
                        if let Err(e) = store.set(&ns, key, value) {
                            tracing::warn!(
                                %covering_id,
                                key = %key,
                                value,
                                error = %e,
                                "Failed to persist covering state"
                            );
                        }
                    }
                })
                .await;

                if let Err(e) = written {
                    tracing::warn!(%covering_id, error = %e, "Store write task failed");
                }
            }
        });

        Self { covering_id, tx }
    }

    /// Queues a write without waiting for it.
    pub(crate) fn write(&self, key: StoreKey, value: u8) {
        if self.tx.send((key, value)).is_err() {
            tracing::warn!(
                covering_id = %self.covering_id,
                key = %key,
                value,
                "Store writer closed, dropping write"
            );
        }
    }
}
