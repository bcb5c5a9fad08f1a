// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::models::Format;

const TAB_COUNT: usize = 3;

/// Format tabs of the reading pane, in display order.
pub static FORMAT_TABS: [Format; TAB_COUNT] = [Format::Html, Format::Plain, Format::Source];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStep {
    Next,
    Previous,
}

/// Enabled mask plus the active tab. Cycling wraps around and skips
/// disabled tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTabs {
    enabled: [bool; TAB_COUNT],
    active: usize,
}

impl Default for FormatTabs {
    fn default() -> Self {
        Self::new(&Format::Html)
    }
}

impl FormatTabs {
    pub fn new(preferred: &Format) -> Self {
        Self {
            enabled: [true; TAB_COUNT],
            active: index_of(preferred).unwrap_or(0),
        }
    }

    /// Show only the tabs the message offers. An active tab that became
    /// disabled falls back to the first enabled one.
    pub fn enable_only(&mut self, formats: &[Format]) {
        for (slot, format) in self.enabled.iter_mut().zip(FORMAT_TABS.iter()) {
            *slot = formats.contains(format);
        }
        if !self.enabled[self.active] {
            if let Some(first) = self.enabled.iter().position(|enabled| *enabled) {
                self.active = first;
            }
        }
    }

    /// Index of the next enabled tab in `step` direction, wrapping. The walk
    /// visits each tab at most once; `None` when nothing is enabled.
    pub fn step(&self, step: TabStep) -> Option<usize> {
        let len = TAB_COUNT;
        (1..=len)
            .map(|offset| match step {
                TabStep::Next => (self.active + offset) % len,
                TabStep::Previous => (self.active + len - offset) % len,
            })
            .find(|&i| self.enabled[i])
    }

    pub fn cycle(&mut self, step: TabStep) -> Option<&'static Format> {
        let index = self.step(step)?;
        self.active = index;
        Some(&FORMAT_TABS[index])
    }

    /// Activate `format` if it has an enabled tab.
    pub fn activate(&mut self, format: &Format) -> bool {
        match index_of(format) {
            Some(i) if self.enabled[i] => {
                self.active = i;
                true
            }
            _ => false,
        }
    }

    pub fn active(&self) -> &'static Format {
        &FORMAT_TABS[self.active]
    }

    pub fn is_enabled(&self, format: &Format) -> bool {
        index_of(format).map_or(false, |i| self.enabled[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static Format, bool)> + '_ {
        FORMAT_TABS.iter().zip(self.enabled.iter().copied())
    }
}

fn index_of(format: &Format) -> Option<usize> {
    FORMAT_TABS.iter().position(|tab| tab == format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_both_ways() {
        let mut tabs = FormatTabs::new(&Format::Html);
        assert_eq!(tabs.cycle(TabStep::Previous), Some(&Format::Source));
        assert_eq!(tabs.cycle(TabStep::Next), Some(&Format::Html));
        assert_eq!(tabs.cycle(TabStep::Next), Some(&Format::Plain));
    }

    #[test]
    fn test_cycle_skips_disabled() {
        let mut tabs = FormatTabs::new(&Format::Html);
        tabs.enable_only(&[Format::Html, Format::Source]);
        assert_eq!(tabs.cycle(TabStep::Next), Some(&Format::Source));
        assert_eq!(tabs.cycle(TabStep::Next), Some(&Format::Html));
    }

    #[test]
    fn test_walk_terminates_with_nothing_enabled() {
        let mut tabs = FormatTabs::new(&Format::Plain);
        tabs.enable_only(&[]);
        assert_eq!(tabs.step(TabStep::Next), None);
        assert_eq!(tabs.cycle(TabStep::Previous), None);
        assert_eq!(tabs.active(), &Format::Plain);
    }

    #[test]
    fn test_single_enabled_tab_cycles_to_itself() {
        let mut tabs = FormatTabs::new(&Format::Html);
        tabs.enable_only(&[Format::Plain]);
        assert_eq!(tabs.active(), &Format::Plain);
        assert_eq!(tabs.cycle(TabStep::Next), Some(&Format::Plain));
    }

    #[test]
    fn test_disabled_active_falls_back_to_first_enabled() {
        let mut tabs = FormatTabs::new(&Format::Html);
        tabs.enable_only(&[Format::Source, Format::Plain]);
        assert_eq!(tabs.active(), &Format::Plain);
        assert!(!tabs.activate(&Format::Html));
        assert!(tabs.activate(&Format::Source));
        assert_eq!(tabs.active(), &Format::Source);
    }

    #[test]
    fn test_unknown_formats_have_no_tab() {
        let mut tabs = FormatTabs::default();
        assert!(!tabs.activate(&Format::Other("amp".into())));
        assert!(!tabs.is_enabled(&Format::Other("amp".into())));
    }
}
