// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::list::MessageList;
use super::search::SearchFilter;
use crate::models::MessageId;

/// Relative movement through the list. `Up` goes toward the head (newer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// At most one selected message. When set, the id exists in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(MessageId),
}

impl Selection {
    pub fn id(&self) -> Option<&MessageId> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(id) => Some(id),
        }
    }

    pub fn is_selected(&self, id: &MessageId) -> bool {
        self.id() == Some(id)
    }

    /// Select `id` if it exists in `list`. Returns false otherwise, leaving
    /// the selection unchanged.
    pub fn select(&mut self, list: &MessageList, id: &MessageId) -> bool {
        if !list.contains(id) {
            return false;
        }
        *self = Selection::Selected(id.clone());
        true
    }

    pub fn unselect(&mut self) {
        *self = Selection::Unselected;
    }

    /// The selected row went away: prefer `next`, then `previous`, else
    /// nothing. Returns the new selection, if any.
    pub fn on_selected_removed(
        &mut self,
        next: Option<MessageId>,
        previous: Option<MessageId>,
    ) -> Option<MessageId> {
        match next.or(previous) {
            Some(id) => {
                *self = Selection::Selected(id.clone());
                Some(id)
            }
            None => {
                *self = Selection::Unselected;
                None
            }
        }
    }

    /// Target of a relative move among visible rows, or `None` to stay put.
    ///
    /// `extreme` jumps to the first/last visible row. Without a selection
    /// both directions land on the first visible row. Single steps skip
    /// hidden rows and never wrap.
    pub fn move_target(
        &self,
        list: &MessageList,
        filter: &SearchFilter,
        direction: Direction,
        extreme: bool,
    ) -> Option<MessageId> {
        let visible = |id: &&MessageId| filter.is_visible(id);

        if extreme {
            return match direction {
                Direction::Up => list.ids().find(visible).cloned(),
                Direction::Down => list.ids().rev().find(visible).cloned(),
            };
        }

        let Some(current) = self.id() else {
            return list.ids().find(visible).cloned();
        };
        let index = list.position(current)?;
        let rows = list.rows();
        let found = match direction {
            Direction::Up => rows[..index].iter().rev().find(|row| filter.is_visible(&row.id)),
            Direction::Down => rows[index + 1..].iter().find(|row| filter.is_visible(&row.id)),
        };
        found.map(|row| row.id.clone())
    }
}
