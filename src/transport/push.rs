// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use futures_util::StreamExt;
use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::{decode_frame, Inbound};
use crate::api::endpoints::Endpoints;
use crate::error::CatcherError;

/// One push connection, held for the lifetime of the client.
///
/// Inbound only: the client never sends frames, and a dropped connection is
/// not retried.
pub struct PushChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl PushChannel {
    pub async fn open(endpoints: &Endpoints) -> Result<Self, CatcherError> {
        let url = endpoints.push_channel()?;
        debug!("Opening push channel at {}", url);
        let (stream, _response) = connect_async(url.as_str()).await?;
        Ok(Self { stream })
    }

    pub fn spawn(self, tx: mpsc::UnboundedSender<Inbound>) -> JoinHandle<()> {
        tokio::spawn(self.read_loop(tx))
    }

    async fn read_loop(mut self, tx: mpsc::UnboundedSender<Inbound>) {
        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(Message::Text(text)) => match decode_frame(&text) {
                    Ok(event) => {
                        if tx.send(Inbound::Event(event)).is_err() {
                            debug!("Push channel receiver dropped, stopping");
                            return;
                        }
                    }
                    Err(e) => warn!("Dropping malformed push frame: {}", e),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("Push channel error: {}", e);
                    break;
                }
            }
        }
        info!("Push channel closed");
    }
}
