// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned message identifier. Only ever compared for equality.
///
/// The server sends integers, but ids are opaque to the client, so both
/// JSON numbers and strings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        MessageId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        MessageId::new(id)
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        MessageId(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => MessageId(n.to_string()),
            RawId::Text(s) => MessageId(s),
        })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lightweight list-row representation of a captured message.
///
/// Never edited in place: a changed message arrives as a removal followed
/// by an addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: MessageId,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A rendering of a message body the server can produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Format {
    Html,
    Plain,
    Source,
    Other(String),
}

impl Format {
    pub fn as_str(&self) -> &str {
        match self {
            Format::Html => "html",
            Format::Plain => "plain",
            Format::Source => "source",
            Format::Other(name) => name,
        }
    }
}

impl From<String> for Format {
    fn from(name: String) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "html" => Format::Html,
            "plain" => Format::Plain,
            "source" => Format::Source,
            _ => Format::Other(name),
        }
    }
}

impl From<&str> for Format {
    fn from(name: &str) -> Self {
        Format::from(name.to_string())
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub cid: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub filename: String,
}

impl Attachment {
    /// Link classes derived from the MIME type, e.g. `image image-png`.
    pub fn classes(&self) -> String {
        let major = self.mime_type.split('/').next().unwrap_or_default();
        format!("{} {}", major, self.mime_type.replacen('/', "-", 1))
    }
}

/// Full detail record fetched for the selected message. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDetail {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub formats: Vec<Format>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}
