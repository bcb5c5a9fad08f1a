// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use super::list::MessageList;
use crate::models::{MessageId, MessageSummary};
use crate::render::row_text;

/// Visibility predicate over the list, derived from the current query.
///
/// Never mutates the list and never touches the selection.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    tokens: Vec<String>,
    /// `None` while no query is active: every row is visible.
    visibility: Option<HashMap<MessageId, bool>>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the query and recompute visibility for the whole list.
    /// An empty or whitespace-only query makes everything visible.
    pub fn apply_query(&mut self, query: &str, list: &MessageList) {
        self.tokens = tokenize(query);
        self.refresh(list);
    }

    /// Re-evaluate every row against the current query.
    pub fn refresh(&mut self, list: &MessageList) {
        if self.tokens.is_empty() {
            self.visibility = None;
            return;
        }
        let visibility = list
            .iter()
            .map(|summary| (summary.id.clone(), matches(&self.tokens, summary)))
            .collect();
        self.visibility = Some(visibility);
    }

    /// Evaluate a newly added row against the active query.
    pub fn evaluate(&mut self, summary: &MessageSummary) {
        if let Some(visibility) = self.visibility.as_mut() {
            visibility.insert(summary.id.clone(), matches(&self.tokens, summary));
        }
    }

    pub fn forget(&mut self, id: &MessageId) {
        if let Some(visibility) = self.visibility.as_mut() {
            visibility.remove(id);
        }
    }

    /// Drop per-row state after the list was emptied; the query stays active.
    pub fn reset_rows(&mut self) {
        if let Some(visibility) = self.visibility.as_mut() {
            visibility.clear();
        }
    }

    pub fn is_visible(&self, id: &MessageId) -> bool {
        match &self.visibility {
            None => true,
            Some(visibility) => visibility.get(id).copied().unwrap_or(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.visibility.is_some()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Conjunctive, case-insensitive substring match over the row text.
fn matches(tokens: &[String], summary: &MessageSummary) -> bool {
    let text = row_text(summary).to_lowercase();
    tokens.iter().all(|token| text.contains(token.as_str()))
}
