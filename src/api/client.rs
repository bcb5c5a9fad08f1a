// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, Response};
#[cfg(test)]
use mockall::automock;
use std::time::Duration;

use super::endpoints::{self, Endpoints};
use crate::error::CatcherError;
use crate::models::{MessageDetail, MessageId, MessageSummary};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The mailbox query/delete interface of the mail-capture server.
///
/// Every mutation reports success only for a 2xx response.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MailboxApi: Send + Sync {
    /// `GET messages`
    async fn list_messages(&self) -> Result<Vec<MessageSummary>, CatcherError>;

    /// `GET messages/{id}.json`
    async fn message_detail(&self, id: &MessageId) -> Result<MessageDetail, CatcherError>;

    /// `DELETE messages/{id}`
    async fn delete_message(&self, id: &MessageId) -> Result<(), CatcherError>;

    /// `DELETE messages`
    async fn clear_messages(&self) -> Result<(), CatcherError>;

    /// `DELETE {base}`, asks the server to shut down.
    async fn quit(&self) -> Result<(), CatcherError>;
}

pub struct HttpMailboxClient {
    client: Client,
    endpoints: Endpoints,
}

impl HttpMailboxClient {
    pub fn new(endpoints: Endpoints) -> Result<Self, CatcherError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, endpoints })
    }

    async fn send(&self, method: Method, path: &str) -> Result<Response, CatcherError> {
        let url = self.endpoints.resolve(path)?;
        debug!("{} {}", method, url);
        let response = self.client.request(method, url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(CatcherError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MailboxApi for HttpMailboxClient {
    async fn list_messages(&self) -> Result<Vec<MessageSummary>, CatcherError> {
        let response = self.send(Method::GET, endpoints::messages_path()).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn message_detail(&self, id: &MessageId) -> Result<MessageDetail, CatcherError> {
        let response = self.send(Method::GET, &endpoints::detail_path(id)).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn delete_message(&self, id: &MessageId) -> Result<(), CatcherError> {
        self.send(Method::DELETE, &endpoints::message_path(id)).await?;
        Ok(())
    }

    async fn clear_messages(&self) -> Result<(), CatcherError> {
        self.send(Method::DELETE, endpoints::messages_path()).await?;
        Ok(())
    }

    async fn quit(&self) -> Result<(), CatcherError> {
        self.send(Method::DELETE, "").await?;
        Ok(())
    }
}
