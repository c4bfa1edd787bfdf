// SPDX-License-Identifier: PMPL-1.0-or-later

//! Rules Portal: a bilingual (English/Arabic) server rules viewer.
//!
//! The crate holds the portal core: localized content documents, a
//! per-language content cache, a navigation state machine kept in step
//! with the address bar, a focus-trapping category overlay and renderers
//! that turn rule sections into a DOM-like node tree.
//!
//! CORE PIECES:
//! 1. **Store**: fetches `<lang>.json` once per language and caches it.
//! 2. **App**: owns navigation state and maps user actions onto a
//!    [`surface::Surface`], a [`url::Navigator`] and a
//!    [`storage::PreferenceStore`].
//! 3. **Render**: pure functions from content to [`render::Node`] trees.

pub mod app;
pub mod config;
pub mod content;
pub mod diagnostics;
pub mod i18n;
pub mod nav;
pub mod output;
pub mod overlay;
pub mod render;
pub mod slug;
pub mod storage;
pub mod store;
pub mod surface;
pub mod tui;
pub mod url;
