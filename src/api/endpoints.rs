// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Addresses of the mail-capture server, all relative to one base URL.

use url::Url;

use crate::error::CatcherError;
use crate::models::{Format, MessageId};

fn encode(id: &MessageId) -> String {
    urlencoding::encode(id.as_str()).into_owned()
}

pub fn messages_path() -> &'static str {
    "messages"
}

pub fn message_path(id: &MessageId) -> String {
    format!("messages/{}", encode(id))
}

pub fn detail_path(id: &MessageId) -> String {
    format!("messages/{}.json", encode(id))
}

pub fn body_path(id: &MessageId, format: &Format) -> String {
    format!("messages/{}.{}", encode(id), format)
}

pub fn download_path(id: &MessageId) -> String {
    format!("messages/{}.eml", encode(id))
}

pub fn attachment_path(id: &MessageId, cid: &str) -> String {
    format!("messages/{}/parts/{}", encode(id), urlencoding::encode(cid))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// The base always ends in `/` so relative paths resolve beneath it.
    pub fn new(base: &str) -> Result<Self, CatcherError> {
        let mut base = Url::parse(base)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CatcherError::Url(format!(
                "unsupported scheme '{}', expected http or https",
                base.scheme()
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn resolve(&self, path: &str) -> Result<Url, CatcherError> {
        Ok(self.base.join(path)?)
    }

    /// Push channel address: `messages` with the scheme upgraded to ws/wss.
    pub fn push_channel(&self) -> Result<Url, CatcherError> {
        let mut url = self.resolve(messages_path())?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| CatcherError::Url(format!("cannot upgrade {} to {}", url, scheme)))?;
        Ok(url)
    }
}
