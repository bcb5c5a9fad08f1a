// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Client-side mailbox state
//
// `Mailbox` is the single writer of what messages exist, which one is
// selected, which rows the search leaves visible and what the reading pane
// shows. Network work is expressed as returned `Effect`s and performed by
// the app loop; completions come back through the methods below.

pub mod detail;
pub mod list;
pub mod search;
pub mod selection;
pub mod tabs;

use log::{debug, error, info};

use crate::api::endpoints;
use crate::error::CatcherError;
use crate::models::{Format, MessageDetail, MessageId, MessageSummary};
use crate::transport::TransportEvent;

pub use detail::{AttachmentLink, DetailLoader, DetailRequest, DetailView};
pub use list::{MessageList, Removal};
pub use search::SearchFilter;
pub use selection::{Direction, Selection};
pub use tabs::{FormatTabs, TabStep};

pub const QUIT_NOTICE: &str = "MailCatcher has been quit";

/// Side effects requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchDetail(DetailRequest),
    Alert(String),
    NavigateAway,
}

#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    list: MessageList,
    selection: Selection,
    search: SearchFilter,
    tabs: FormatTabs,
    loader: DetailLoader,
    detail: Option<DetailView>,
    quitting: bool,
    revision: u64,
}

impl Mailbox {
    pub fn new(default_format: &Format) -> Self {
        Self {
            tabs: FormatTabs::new(default_format),
            ..Self::default()
        }
    }

    /// Initial full fetch. Ids already delivered by live events are skipped.
    pub fn bootstrap(&mut self, summaries: Vec<MessageSummary>) -> usize {
        let added = self.list.bootstrap(summaries);
        if added > 0 {
            self.search.refresh(&self.list);
            self.touch();
        }
        info!("Bootstrap added {} messages ({} known)", added, self.list.len());
        added
    }

    pub fn apply(&mut self, event: TransportEvent) -> Vec<Effect> {
        match event {
            TransportEvent::Added(summary) => {
                self.add(summary);
                Vec::new()
            }
            TransportEvent::Removed(id) => self.remove(&id),
            TransportEvent::Cleared => {
                self.clear();
                Vec::new()
            }
            TransportEvent::Quit => {
                if self.quitting {
                    debug!("Ignoring quit event triggered by this client");
                    Vec::new()
                } else {
                    vec![Effect::Alert(QUIT_NOTICE.to_string()), Effect::NavigateAway]
                }
            }
        }
    }

    pub fn add(&mut self, summary: MessageSummary) -> bool {
        if self.list.contains(&summary.id) {
            debug!("Message {} already known, ignoring", summary.id);
            return false;
        }
        self.search.evaluate(&summary);
        self.list.add(summary);
        self.touch();
        true
    }

    /// Remove one message; a selected one hands the selection to its
    /// neighbour. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &MessageId) -> Vec<Effect> {
        let Some(Removal { id, next, previous }) = self.list.remove(id) else {
            debug!("Message {} already gone", id);
            return Vec::new();
        };
        self.search.forget(&id);
        self.touch();

        if !self.selection.is_selected(&id) {
            return Vec::new();
        }
        match self.selection.on_selected_removed(next, previous) {
            Some(successor) => vec![Effect::FetchDetail(self.loader.begin(&successor))],
            None => {
                self.clear_detail();
                Vec::new()
            }
        }
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.search.reset_rows();
        self.selection.unselect();
        self.clear_detail();
        self.touch();
    }

    pub fn select(&mut self, id: &MessageId) -> Vec<Effect> {
        if !self.selection.select(&self.list, id) {
            debug!("Cannot select unknown message {}", id);
            return Vec::new();
        }
        self.touch();
        vec![Effect::FetchDetail(self.loader.begin(id))]
    }

    pub fn move_relative(&mut self, direction: Direction, extreme: bool) -> Vec<Effect> {
        match self
            .selection
            .move_target(&self.list, &self.search, direction, extreme)
        {
            Some(target) => self.select(&target),
            None => Vec::new(),
        }
    }

    /// Recompute visibility. Never changes the selection.
    pub fn apply_query(&mut self, query: &str) {
        self.search.apply_query(query, &self.list);
        self.touch();
    }

    /// Apply a detail response. Stale generations and failures leave the
    /// current view untouched; returns whether the view changed.
    pub fn complete_detail(
        &mut self,
        request: &DetailRequest,
        result: Result<MessageDetail, CatcherError>,
    ) -> bool {
        if !self.loader.is_current(request) {
            debug!(
                "Discarding stale detail for message {} (generation {})",
                request.id, request.generation
            );
            return false;
        }
        match result {
            Ok(detail) => {
                self.tabs.enable_only(&detail.formats);
                self.detail = Some(DetailView::from_detail(&request.id, &detail));
                self.touch();
                true
            }
            Err(e) => {
                error!("Failed to load message {}: {}", request.id, e);
                false
            }
        }
    }

    pub fn cycle_tab(&mut self, step: TabStep) -> bool {
        if self.tabs.cycle(step).is_none() {
            return false;
        }
        self.touch();
        true
    }

    pub fn show_format(&mut self, format: &Format) -> bool {
        if !self.tabs.activate(format) {
            return false;
        }
        self.touch();
        true
    }

    /// Address of the selected body in the active format, once the
    /// selected message's metadata has loaded. `None` when the message
    /// offers none of the html, plain or source renderings.
    pub fn body_path(&self) -> Option<String> {
        let detail = self.detail.as_ref()?;
        let active = self.tabs.active();
        if !self.selection.is_selected(&detail.id) || !self.tabs.is_enabled(active) {
            return None;
        }
        Some(endpoints::body_path(&detail.id, active))
    }

    pub fn begin_quit(&mut self) {
        self.quitting = true;
    }

    pub fn quit_failed(&mut self) {
        self.quitting = false;
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn list(&self) -> &MessageList {
        &self.list
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_id(&self) -> Option<&MessageId> {
        self.selection.id()
    }

    pub fn search(&self) -> &SearchFilter {
        &self.search
    }

    pub fn tabs(&self) -> &FormatTabs {
        &self.tabs
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &MessageSummary> {
        self.list
            .iter()
            .filter(|summary| self.search.is_visible(&summary.id))
    }

    /// Total number of known messages, shown in the title.
    pub fn count(&self) -> usize {
        self.list.len()
    }

    /// Bumped on every observable change; the app re-renders when it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn clear_detail(&mut self) {
        self.detail = None;
        self.loader.invalidate();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
