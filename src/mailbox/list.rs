// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashSet;

use crate::models::{MessageId, MessageSummary};

/// Outcome of removing a row: the removed id and its former neighbours.
///
/// `next` is the neighbour toward the head (newer), `previous` the one
/// toward the tail (older).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub id: MessageId,
    pub next: Option<MessageId>,
    pub previous: Option<MessageId>,
}

/// Ordered, id-unique collection of known messages, newest first.
///
/// Order is the arrival order of additions, not message timestamps.
#[derive(Debug, Clone, Default)]
pub struct MessageList {
    rows: Vec<MessageSummary>,
    ids: HashSet<MessageId>,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every summary not already known, in the given order. Safe to
    /// call when some of them arrived first through live events.
    pub fn bootstrap<I>(&mut self, summaries: I) -> usize
    where
        I: IntoIterator<Item = MessageSummary>,
    {
        let mut added = 0;
        for summary in summaries {
            if self.add(summary) {
                added += 1;
            }
        }
        added
    }

    /// Insert at the head. Returns false, leaving the list untouched, if the
    /// id is already present.
    pub fn add(&mut self, summary: MessageSummary) -> bool {
        if !self.ids.insert(summary.id.clone()) {
            return false;
        }
        self.rows.insert(0, summary);
        true
    }

    pub fn remove(&mut self, id: &MessageId) -> Option<Removal> {
        let index = self.position(id)?;
        let next = index
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .map(|row| row.id.clone());
        let previous = self.rows.get(index + 1).map(|row| row.id.clone());

        let removed = self.rows.remove(index);
        self.ids.remove(&removed.id);
        Some(Removal {
            id: removed.id,
            next,
            previous,
        })
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.ids.clear();
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.ids.contains(id)
    }

    pub fn position(&self, id: &MessageId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.rows.iter().position(|row| &row.id == id)
    }

    pub fn rows(&self) -> &[MessageSummary] {
        &self.rows
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &MessageSummary> {
        self.rows.iter()
    }

    pub fn ids(&self) -> impl DoubleEndedIterator<Item = &MessageId> {
        self.rows.iter().map(|row| &row.id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
