// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

use super::{Inbound, TransportEvent};
use crate::api::client::MailboxApi;
use crate::mailbox::list::MessageList;
use crate::models::MessageSummary;

/// Fixed-period full-list fetch used when no push channel is available.
pub struct Poller {
    api: Arc<dyn MailboxApi>,
    period: Duration,
}

impl Poller {
    pub fn new(api: Arc<dyn MailboxApi>, period: Duration) -> Self {
        Self { api, period }
    }

    /// Start the repeating fetch. It runs until the receiver goes away or
    /// the task is aborted; a failed fetch only skips that tick.
    pub fn spawn(self, tx: mpsc::UnboundedSender<Inbound>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = time::interval(self.period);
            interval.tick().await; // Skip the first immediate tick, bootstrap covers it

            loop {
                interval.tick().await;
                match self.api.list_messages().await {
                    Ok(messages) => {
                        debug!("Poll fetched {} messages", messages.len());
                        if tx.send(Inbound::Snapshot(messages)).is_err() {
                            debug!("Poll receiver dropped, stopping");
                            return;
                        }
                    }
                    Err(e) => warn!("Poll failed: {}", e),
                }
            }
        })
    }
}

/// Synthetic `Added` events for every fetched message absent from `list`,
/// in server order. Polling never produces removals.
pub fn diff_snapshot(list: &MessageList, fetched: Vec<MessageSummary>) -> Vec<TransportEvent> {
    let mut seen = HashSet::new();
    fetched
        .into_iter()
        .filter(|summary| !list.contains(&summary.id) && seen.insert(summary.id.clone()))
        .map(TransportEvent::Added)
        .collect()
}
