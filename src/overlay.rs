// SPDX-License-Identifier: PMPL-1.0-or-later

//! Category picker overlay
//!
//! A two-state modal: while open it locks page scrolling and traps
//! keyboard focus inside its panel. Focus is captured on open and handed
//! back on close.
//!
//! The initial focus move cannot happen while the surface is still
//! updating, so `open` only records it; the caller runs
//! [`OverlayController::after_commit`] once its render pass is done.

use crate::surface::{Slot, Surface};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
}

/// Keys the overlay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    ShiftTab,
    Enter,
    Other,
}

/// Where a pointer press inside the overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area outside the panel.
    Backdrop,
    Panel,
}

#[derive(Debug, Default)]
pub struct OverlayController {
    state: OverlayState,
    restore: Option<String>,
    pending_focus: bool,
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == OverlayState::Open
    }

    /// Write the current state to the surface without side effects on focus.
    pub fn sync(&self, surface: &mut impl Surface) {
        let open = self.is_open();
        surface.set_hidden(Slot::TocOverlay, !open);
        surface.set_attr(Slot::TocOverlay, "data-open", if open { "true" } else { "false" });
        surface.set_attr(Slot::TocOverlay, "aria-hidden", if open { "false" } else { "true" });
        surface.set_attr(Slot::TocToggle, "aria-expanded", if open { "true" } else { "false" });
    }

    pub fn open(&mut self, surface: &mut impl Surface) {
        if self.is_open() || !surface.has(Slot::TocOverlay) {
            return;
        }
        self.restore = surface.focused();
        self.state = OverlayState::Open;
        self.pending_focus = true;
        surface.set_scroll_locked(true);
        self.sync(surface);
    }

    pub fn close(&mut self, surface: &mut impl Surface) {
        if !self.is_open() {
            return;
        }
        self.state = OverlayState::Closed;
        self.pending_focus = false;
        surface.set_scroll_locked(false);
        self.sync(surface);
        if let Some(id) = self.restore.take() {
            surface.focus(&id);
        }
    }

    pub fn toggle(&mut self, surface: &mut impl Surface) {
        if self.is_open() {
            self.close(surface);
        } else {
            self.open(surface);
        }
    }

    /// Run the deferred initial focus move, if one is pending.
    pub fn after_commit(&mut self, surface: &mut impl Surface) {
        if !std::mem::take(&mut self.pending_focus) || !self.is_open() {
            return;
        }
        match surface.focusables(Slot::TocPanel).first() {
            Some(first) => surface.focus(first),
            None => surface.focus(Slot::TocPanel.id()),
        };
    }

    pub fn on_backdrop_click(&mut self, target: ClickTarget, surface: &mut impl Surface) {
        if target == ClickTarget::Backdrop {
            self.close(surface);
        }
    }

    /// Returns `true` when the key was consumed.
    pub fn on_key(&mut self, key: Key, surface: &mut impl Surface) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            Key::Escape => {
                self.close(surface);
                true
            }
            Key::Tab => {
                self.cycle(surface, true);
                true
            }
            Key::ShiftTab => {
                self.cycle(surface, false);
                true
            }
            Key::Enter | Key::Other => false,
        }
    }

    fn cycle(&self, surface: &mut impl Surface, forward: bool) {
        let focusables = surface.focusables(Slot::TocPanel);
        if focusables.is_empty() {
            surface.focus(Slot::TocPanel.id());
            return;
        }
        let current = surface.focused();
        let position = current
            .as_deref()
            .and_then(|id| focusables.iter().position(|f| f == id));
        let target = trap_target(position, focusables.len(), forward);
        surface.focus(&focusables[target]);
    }
}

/// Index focus moves to inside a trap of `len` elements. `position` is the
/// current index, `None` when focus sits on the panel or outside it.
pub fn trap_target(position: Option<usize>, len: usize, forward: bool) -> usize {
    debug_assert!(len > 0);
    match (position, forward) {
        (Some(i), true) => (i + 1) % len,
        (None, true) => 0,
        (Some(0) | None, false) => len - 1,
        (Some(i), false) => i - 1,
    }
}
