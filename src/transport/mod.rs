// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Transport Adapter
//
// Delivers server-side mailbox changes to the client, either over a push
// channel (WebSocket) or by polling the message list on a fixed period.
// The choice is made once at startup and never revisited.

pub mod poll;
pub mod push;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::client::MailboxApi;
use crate::api::endpoints::Endpoints;
use crate::error::CatcherError;
use crate::models::{MessageId, MessageSummary};

pub use poll::Poller;
pub use push::PushChannel;

/// The four mailbox events the client reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Added(MessageSummary),
    Removed(MessageId),
    Cleared,
    Quit,
}

/// What a running transport hands to the app loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Event(TransportEvent),
    /// Full list fetched by the poller; diffed against the local list.
    Snapshot(Vec<MessageSummary>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Connected,
    DisconnectedPolling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Use the push channel when the handshake succeeds, otherwise poll.
    #[default]
    Auto,
    Push,
    Poll,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Envelope {
    Add { message: MessageSummary },
    Remove { id: MessageId },
    Clear,
    Quit,
}

/// Decode one push-channel text frame.
pub fn decode_frame(text: &str) -> Result<TransportEvent, CatcherError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    Ok(match envelope {
        Envelope::Add { message } => TransportEvent::Added(message),
        Envelope::Remove { id } => TransportEvent::Removed(id),
        Envelope::Clear => TransportEvent::Cleared,
        Envelope::Quit => TransportEvent::Quit,
    })
}

/// Handle to the running transport task.
pub struct TransportAdapter {
    state: TransportState,
    handle: JoinHandle<()>,
}

impl TransportAdapter {
    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Detect push capability and start the matching transport.
pub async fn start(
    mode: TransportMode,
    endpoints: &Endpoints,
    api: Arc<dyn MailboxApi>,
    poll_interval: Duration,
    tx: mpsc::UnboundedSender<Inbound>,
) -> Result<TransportAdapter, CatcherError> {
    let channel = match mode {
        TransportMode::Poll => None,
        TransportMode::Push => Some(PushChannel::open(endpoints).await?),
        TransportMode::Auto => match PushChannel::open(endpoints).await {
            Ok(channel) => Some(channel),
            Err(e) => {
                warn!("Push channel unavailable ({}), falling back to polling", e);
                None
            }
        },
    };

    let adapter = match channel {
        Some(channel) => {
            info!("Subscribed to push channel");
            TransportAdapter {
                state: TransportState::Connected,
                handle: channel.spawn(tx),
            }
        }
        None => {
            info!("Polling for messages every {}ms", poll_interval.as_millis());
            TransportAdapter {
                state: TransportState::DisconnectedPolling,
                handle: Poller::new(api, poll_interval).spawn(tx),
            }
        }
    };
    Ok(adapter)
}
