// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatcherError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("WebSocket error: {0}")]
    WebSocket(String),
    #[error("Invalid URL: {0}")]
    Url(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl CatcherError {
    /// True for failures the server reported with a non-success status.
    pub fn is_status(&self) -> bool {
        matches!(self, CatcherError::Status { .. })
    }
}

impl From<url::ParseError> for CatcherError {
    fn from(err: url::ParseError) -> Self {
        CatcherError::Url(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CatcherError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        CatcherError::WebSocket(err.to_string())
    }
}

impl From<config::ConfigError> for CatcherError {
    fn from(err: config::ConfigError) -> Self {
        CatcherError::Config(err.to_string())
    }
}
