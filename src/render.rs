// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Text projection of the mailbox state. Pure: nothing here mutates state.

use std::fmt::Write;

use crate::api::endpoints::Endpoints;
use crate::mailbox::Mailbox;
use crate::models::MessageSummary;
use crate::utils::date::format_date;

/// One list cell. `blank` marks placeholder text for a missing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub blank: bool,
}

impl Cell {
    fn new(value: String, fallback: &str) -> Self {
        if value.is_empty() {
            Cell { text: fallback.to_string(), blank: true }
        } else {
            Cell { text: value, blank: false }
        }
    }

    /// Placeholders are bracketed so they cannot pass for real values.
    fn display(&self) -> String {
        if self.blank && !self.text.is_empty() {
            format!("({})", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Sender, recipients, subject and date cells of a list row.
pub fn row_cells(summary: &MessageSummary) -> [Cell; 4] {
    [
        Cell::new(summary.sender.clone().unwrap_or_default(), "No sender"),
        Cell::new(summary.recipients.join(", "), "No recipients"),
        Cell::new(summary.subject.clone().unwrap_or_default(), "No subject"),
        Cell::new(format_date(summary.created_at.as_deref()), ""),
    ]
}

/// Full text of a row as displayed, which is what search matches against.
pub fn row_text(summary: &MessageSummary) -> String {
    row_cells(summary)
        .iter()
        .map(|cell| cell.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn title(count: usize) -> String {
    format!("MailCatcher ({})", count)
}

/// First row index of a window of `height` rows that keeps `selected` in view.
pub fn window_start(selected: Option<usize>, height: usize) -> usize {
    match selected {
        Some(index) if height > 0 && index >= height => index + 1 - height,
        _ => 0,
    }
}

/// Render the title, the visible rows (at most `height` of them, scrolled to
/// the selection) and the reading pane.
pub fn render(mailbox: &Mailbox, endpoints: &Endpoints, height: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title(mailbox.count()));
    if mailbox.search().is_active() {
        let _ = writeln!(out, "search: {}", mailbox.search().tokens().join(" "));
    }

    let rows: Vec<&MessageSummary> = mailbox.visible_rows().collect();
    let selected = mailbox
        .selected_id()
        .and_then(|id| rows.iter().position(|row| &row.id == id));
    let height = height.unwrap_or(rows.len()).max(1);
    let start = window_start(selected, height);

    for summary in rows.iter().skip(start).take(height) {
        let marker = if mailbox.selection().is_selected(&summary.id) { '>' } else { ' ' };
        let cells = row_cells(summary);
        let _ = writeln!(
            out,
            "{} {:>5}  {:<30}  {:<30}  {:<40}  {}",
            marker,
            summary.id,
            cells[0].display(),
            cells[1].display(),
            cells[2].display(),
            cells[3].display()
        );
    }
    if rows.len() > height {
        let _ = writeln!(out, "  ({} of {} rows shown)", height, rows.len());
    }

    let Some(detail) = mailbox.detail() else {
        return out;
    };
    let _ = writeln!(out, "----");
    let _ = writeln!(out, "Received: {}", detail.created_at);
    let _ = writeln!(out, "From:     {}", detail.from);
    let _ = writeln!(out, "To:       {}", detail.to);
    let _ = writeln!(out, "Subject:  {}", detail.subject);
    if detail.shows_attachments() {
        let _ = writeln!(out, "Attachments:");
        for link in &detail.attachments {
            let href = endpoints
                .resolve(&link.href)
                .map(|url| url.to_string())
                .unwrap_or_else(|_| link.href.clone());
            let _ = writeln!(out, "  {} [{}] {}", link.label, link.classes, href);
        }
    }

    let tabs: Vec<String> = mailbox
        .tabs()
        .iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(format, _)| {
            if format == mailbox.tabs().active() {
                format!("[{}]", format)
            } else {
                format.to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "Views:    {}  download", tabs.join(" "));
    match mailbox.body_path().and_then(|path| endpoints.resolve(&path).ok()) {
        Some(url) => {
            let _ = writeln!(out, "Body:     {}", url);
        }
        None => {
            let _ = writeln!(out, "Body:     (no viewable format)");
        }
    }
    out
}
