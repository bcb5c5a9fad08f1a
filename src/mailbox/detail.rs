// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::api::endpoints;
use crate::models::{MessageDetail, MessageId};
use crate::utils::date::format_date;

/// A detail fetch tagged with the selection generation it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub generation: u64,
    pub id: MessageId,
}

/// Issues generation tags so completions for superseded selections can be
/// recognised and discarded.
#[derive(Debug, Clone, Default)]
pub struct DetailLoader {
    generation: u64,
}

impl DetailLoader {
    pub fn begin(&mut self, id: &MessageId) -> DetailRequest {
        self.generation += 1;
        DetailRequest {
            generation: self.generation,
            id: id.clone(),
        }
    }

    /// Outstanding requests become stale, e.g. after unselecting.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    pub fn is_current(&self, request: &DetailRequest) -> bool {
        request.generation == self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLink {
    pub href: String,
    pub label: String,
    pub classes: String,
}

/// Metadata pane of the selected message. Body and attachment addresses
/// are relative to the server base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: MessageId,
    pub created_at: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub attachments: Vec<AttachmentLink>,
    pub download_href: String,
}

impl DetailView {
    pub fn from_detail(id: &MessageId, detail: &MessageDetail) -> Self {
        let attachments = detail
            .attachments
            .iter()
            .map(|attachment| AttachmentLink {
                href: endpoints::attachment_path(id, &attachment.cid),
                label: attachment.filename.clone(),
                classes: attachment.classes(),
            })
            .collect();

        Self {
            id: id.clone(),
            created_at: format_date(detail.created_at.as_deref()),
            from: detail.sender.clone().unwrap_or_default(),
            to: detail.recipients.join(", "),
            subject: detail.subject.clone().unwrap_or_default(),
            attachments,
            download_href: endpoints::download_path(id),
        }
    }

    pub fn shows_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}
