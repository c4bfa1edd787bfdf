// SPDX-License-Identifier: PMPL-1.0-or-later

//! Presentation surface
//!
//! The controller never builds a page. It writes into a fixed set of named
//! [`Slot`]s on a [`Surface`], and any slot may be absent: the landing page
//! has no application root, an embedder may drop the overlay. Every write
//! to a missing slot is silently ignored.
//!
//! [`MemorySurface`] is the in-process implementation used by the CLI and
//! by tests. It can be dumped as an HTML skeleton or serialized.

use crate::i18n::Lang;
use crate::render::{Element, Node};
use serde::Serialize;
use std::collections::BTreeMap;

/// Named regions and controls the controller writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Slot {
    BrandSubtitle,
    PageTitle,
    PageSubtitle,
    PageDesc,
    HomeBtn,
    LangEn,
    LangAr,
    AppRoot,
    TocToggle,
    CategoriesTitle,
    CategoriesSubtitle,
    CategoriesGrid,
    BackBtn,
    NextCatBtn,
    DetailTitle,
    DetailHint,
    DetailBody,
    TocOverlay,
    TocPanel,
    TocOverlayTitle,
    TocClose,
    TocGridMobile,
    LoadError,
    LoadErrorMessage,
    RetryBtn,
}

impl Slot {
    /// Every slot, in document order.
    pub const ALL: [Slot; 25] = [
        Slot::BrandSubtitle,
        Slot::PageTitle,
        Slot::PageSubtitle,
        Slot::PageDesc,
        Slot::HomeBtn,
        Slot::LangEn,
        Slot::LangAr,
        Slot::AppRoot,
        Slot::TocToggle,
        Slot::CategoriesTitle,
        Slot::CategoriesSubtitle,
        Slot::CategoriesGrid,
        Slot::BackBtn,
        Slot::NextCatBtn,
        Slot::DetailTitle,
        Slot::DetailHint,
        Slot::DetailBody,
        Slot::TocOverlay,
        Slot::TocPanel,
        Slot::TocOverlayTitle,
        Slot::TocClose,
        Slot::TocGridMobile,
        Slot::LoadError,
        Slot::LoadErrorMessage,
        Slot::RetryBtn,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Slot::BrandSubtitle => "brandSubtitle",
            Slot::PageTitle => "pageTitle",
            Slot::PageSubtitle => "pageSubtitle",
            Slot::PageDesc => "pageDesc",
            Slot::HomeBtn => "homeBtn",
            Slot::LangEn => "langEn",
            Slot::LangAr => "langAr",
            Slot::AppRoot => "appRoot",
            Slot::TocToggle => "tocToggle",
            Slot::CategoriesTitle => "categoriesTitle",
            Slot::CategoriesSubtitle => "categoriesSubtitle",
            Slot::CategoriesGrid => "categoriesGrid",
            Slot::BackBtn => "backBtn",
            Slot::NextCatBtn => "nextCatBtn",
            Slot::DetailTitle => "detailTitle",
            Slot::DetailHint => "detailHint",
            Slot::DetailBody => "detailBody",
            Slot::TocOverlay => "tocOverlay",
            Slot::TocPanel => "tocPanel",
            Slot::TocOverlayTitle => "tocOverlayTitle",
            Slot::TocClose => "tocClose",
            Slot::TocGridMobile => "tocGridMobile",
            Slot::LoadError => "loadError",
            Slot::LoadErrorMessage => "loadErrorMessage",
            Slot::RetryBtn => "retryBtn",
        }
    }

    pub fn from_id(id: &str) -> Option<Slot> {
        Slot::ALL.iter().copied().find(|slot| slot.id() == id)
    }

    /// Enclosing slot, or `None` for top-level regions.
    pub fn parent(&self) -> Option<Slot> {
        match self {
            Slot::TocToggle
            | Slot::CategoriesTitle
            | Slot::CategoriesSubtitle
            | Slot::CategoriesGrid
            | Slot::BackBtn
            | Slot::NextCatBtn
            | Slot::DetailTitle
            | Slot::DetailHint
            | Slot::DetailBody => Some(Slot::AppRoot),
            Slot::TocPanel => Some(Slot::TocOverlay),
            Slot::TocOverlayTitle | Slot::TocClose | Slot::TocGridMobile => Some(Slot::TocPanel),
            Slot::LoadErrorMessage | Slot::RetryBtn => Some(Slot::LoadError),
            _ => None,
        }
    }

    /// `self` is `container` or sits somewhere inside it.
    pub fn is_within(&self, container: Slot) -> bool {
        let mut current = Some(*self);
        while let Some(slot) = current {
            if slot == container {
                return true;
            }
            current = slot.parent();
        }
        false
    }

    /// Buttons the user can tab to.
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Slot::HomeBtn
                | Slot::LangEn
                | Slot::LangAr
                | Slot::TocToggle
                | Slot::BackBtn
                | Slot::NextCatBtn
                | Slot::TocClose
                | Slot::RetryBtn
        )
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Slot::PageTitle => "h1",
            Slot::CategoriesTitle | Slot::DetailTitle | Slot::TocOverlayTitle => "h2",
            Slot::PageSubtitle | Slot::PageDesc | Slot::DetailHint | Slot::LoadErrorMessage => "p",
            Slot::AppRoot => "main",
            Slot::TocGridMobile => "nav",
            slot if slot.is_control() => "button",
            _ => "div",
        }
    }
}

/// What the controller needs from a page.
pub trait Surface {
    fn has(&self, slot: Slot) -> bool;
    fn set_text(&mut self, slot: Slot, text: &str);
    fn set_attr(&mut self, slot: Slot, name: &str, value: &str);
    /// Replace the slot's rendered content.
    fn set_children(&mut self, slot: Slot, children: Vec<Node>);
    fn set_hidden(&mut self, slot: Slot, hidden: bool);
    fn set_enabled(&mut self, slot: Slot, enabled: bool);
    /// Document-level `lang` and `dir`.
    fn set_document_lang(&mut self, lang: Lang);
    fn set_scroll_locked(&mut self, locked: bool);
    /// Id of the element holding focus.
    fn focused(&self) -> Option<String>;
    /// Move focus to a slot or rendered element by id. Unknown ids are
    /// ignored and return `false`.
    fn focus(&mut self, id: &str) -> bool;
    /// Ids of focusable elements inside `container`, in document order.
    fn focusables(&self, container: Slot) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    pub hidden: bool,
    pub enabled: bool,
}

impl Default for SlotState {
    fn default() -> Self {
        Self {
            text: None,
            attrs: BTreeMap::new(),
            children: Vec::new(),
            hidden: false,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySurface {
    slots: BTreeMap<Slot, SlotState>,
    lang: Option<Lang>,
    scroll_locked: bool,
    focused: Option<String>,
}

/// Serializable view of a [`MemorySurface`].
#[derive(Debug, Serialize)]
pub struct SurfaceSnapshot<'a> {
    pub lang: Option<&'static str>,
    pub dir: Option<&'static str>,
    pub scroll_locked: bool,
    pub focused: Option<&'a str>,
    pub slots: BTreeMap<&'static str, &'a SlotState>,
}

impl MemorySurface {
    pub fn with_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            slots: slots.into_iter().map(|s| (s, SlotState::default())).collect(),
            lang: None,
            scroll_locked: false,
            focused: None,
        }
    }

    /// The full rules page.
    pub fn full() -> Self {
        let mut surface = Self::with_slots(Slot::ALL.iter().copied().filter(|s| *s != Slot::HomeBtn));
        // Closed overlay and no error until told otherwise.
        surface.set_hidden(Slot::TocOverlay, true);
        surface.set_hidden(Slot::LoadError, true);
        surface
    }

    /// The landing page: brand strings, language buttons and the entry link.
    pub fn landing() -> Self {
        Self::with_slots([
            Slot::BrandSubtitle,
            Slot::PageTitle,
            Slot::PageSubtitle,
            Slot::PageDesc,
            Slot::HomeBtn,
            Slot::LangEn,
            Slot::LangAr,
        ])
    }

    pub fn slot(&self, slot: Slot) -> Option<&SlotState> {
        self.slots.get(&slot)
    }

    pub fn text(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).and_then(|s| s.text.as_deref())
    }

    pub fn attr(&self, slot: Slot, name: &str) -> Option<&str> {
        self.slots
            .get(&slot)
            .and_then(|s| s.attrs.get(name))
            .map(String::as_str)
    }

    pub fn children(&self, slot: Slot) -> &[Node] {
        self.slots
            .get(&slot)
            .map(|s| s.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_hidden(&self, slot: Slot) -> bool {
        self.slots.get(&slot).map(|s| s.hidden).unwrap_or(true)
    }

    /// Hidden itself or through an enclosing slot.
    pub fn is_effectively_hidden(&self, slot: Slot) -> bool {
        let mut current = Some(slot);
        while let Some(s) = current {
            if self.slots.get(&s).map(|st| st.hidden).unwrap_or(false) {
                return true;
            }
            current = s.parent();
        }
        false
    }

    pub fn is_enabled(&self, slot: Slot) -> bool {
        self.slots.get(&slot).map(|s| s.enabled).unwrap_or(false)
    }

    pub fn lang(&self) -> Option<Lang> {
        self.lang
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn snapshot(&self) -> SurfaceSnapshot<'_> {
        SurfaceSnapshot {
            lang: self.lang.map(|l| l.code()),
            dir: self.lang.map(|l| l.direction().as_str()),
            scroll_locked: self.scroll_locked,
            focused: self.focused.as_deref(),
            slots: self.slots.iter().map(|(slot, state)| (slot.id(), state)).collect(),
        }
    }

    /// Page skeleton with every present slot nested under its parent.
    pub fn to_html(&self) -> String {
        let mut html = Element::new("html");
        if let Some(lang) = self.lang {
            html = html
                .attr("lang", lang.code())
                .attr("dir", lang.direction().as_str());
        }
        let mut body = Element::new("body");
        if self.scroll_locked {
            body = body.attr("data-scroll-locked", "true");
        }
        let roots = self.slots.keys().filter(|slot| {
            // Orphaned slots are promoted to the top level.
            slot.parent().map(|p| !self.slots.contains_key(&p)).unwrap_or(true)
        });
        let body = body.children(roots.map(|slot| Node::from(self.slot_element(*slot))));
        Node::from(html.child(body)).to_html()
    }

    fn slot_element(&self, slot: Slot) -> Element {
        let mut el = Element::new(slot.tag()).attr("id", slot.id());
        let Some(state) = self.slots.get(&slot) else {
            return el;
        };
        for (name, value) in &state.attrs {
            el = el.attr(name, value.as_str());
        }
        if state.hidden {
            el = el.attr("hidden", "");
        }
        if !state.enabled {
            el = el.attr("disabled", "");
        }
        if let Some(text) = &state.text {
            el = el.text(text.as_str());
        }
        el = el.children(state.children.iter().cloned());
        let nested = self
            .slots
            .keys()
            .filter(|child| child.parent() == Some(slot))
            .map(|child| Node::from(self.slot_element(*child)));
        el.children(nested)
    }

    fn contains_id(&self, id: &str) -> bool {
        if Slot::from_id(id).is_some_and(|slot| self.slots.contains_key(&slot)) {
            return true;
        }
        self.slots.values().any(|state| {
            state
                .children
                .iter()
                .flat_map(Node::elements)
                .any(|el| el.get_attr("id") == Some(id))
        })
    }
}

impl Surface for MemorySurface {
    fn has(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    fn set_text(&mut self, slot: Slot, text: &str) {
        if let Some(state) = self.slots.get_mut(&slot) {
            state.text = Some(text.to_string());
        }
    }

    fn set_attr(&mut self, slot: Slot, name: &str, value: &str) {
        if let Some(state) = self.slots.get_mut(&slot) {
            state.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn set_children(&mut self, slot: Slot, children: Vec<Node>) {
        if let Some(state) = self.slots.get_mut(&slot) {
            state.children = children;
        }
    }

    fn set_hidden(&mut self, slot: Slot, hidden: bool) {
        if let Some(state) = self.slots.get_mut(&slot) {
            state.hidden = hidden;
        }
    }

    fn set_enabled(&mut self, slot: Slot, enabled: bool) {
        if let Some(state) = self.slots.get_mut(&slot) {
            state.enabled = enabled;
        }
    }

    fn set_document_lang(&mut self, lang: Lang) {
        self.lang = Some(lang);
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn focused(&self) -> Option<String> {
        self.focused.clone()
    }

    fn focus(&mut self, id: &str) -> bool {
        if !self.contains_id(id) {
            return false;
        }
        self.focused = Some(id.to_string());
        true
    }

    fn focusables(&self, container: Slot) -> Vec<String> {
        let mut ids = Vec::new();
        for (slot, state) in &self.slots {
            if !slot.is_within(container) || self.is_effectively_hidden(*slot) {
                continue;
            }
            if slot.is_control() && state.enabled {
                ids.push(slot.id().to_string());
            }
            ids.extend(
                state
                    .children
                    .iter()
                    .flat_map(Node::elements)
                    .filter(|el| el.is_focusable())
                    .filter_map(|el| el.get_attr("id"))
                    .map(str::to_string),
            );
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_ids_roundtrip() {
        for slot in Slot::ALL {
            assert_eq!(Slot::from_id(slot.id()), Some(slot));
        }
        assert_eq!(Slot::from_id("nope"), None);
    }

    #[test]
    fn all_is_in_declaration_order() {
        let mut sorted = Slot::ALL;
        sorted.sort();
        assert_eq!(sorted, Slot::ALL);
    }

    #[test]
    fn writes_to_missing_slots_are_ignored() {
        let mut surface = MemorySurface::landing();
        surface.set_text(Slot::DetailTitle, "x");
        surface.set_hidden(Slot::AppRoot, true);
        assert!(!surface.has(Slot::DetailTitle));
        assert_eq!(surface.text(Slot::DetailTitle), None);
        assert!(!surface.focus("detailTitle"));
    }

    #[test]
    fn focusables_skip_disabled_and_hidden() {
        let mut surface = MemorySurface::full();
        assert!(surface.focusables(Slot::TocPanel).is_empty());
        surface.set_hidden(Slot::TocOverlay, false);
        surface.set_children(
            Slot::TocGridMobile,
            vec![
                Element::new("a").attr("id", "toc-core").into(),
                Element::new("a").into(),
            ],
        );
        assert_eq!(surface.focusables(Slot::TocPanel), vec!["tocClose", "toc-core"]);

        surface.set_enabled(Slot::TocClose, false);
        assert_eq!(surface.focusables(Slot::TocPanel), vec!["toc-core"]);

        // The error region starts hidden, so its retry button is not reachable.
        assert!(surface.focusables(Slot::LoadError).is_empty());
        surface.set_hidden(Slot::LoadError, false);
        assert_eq!(surface.focusables(Slot::LoadError), vec!["retryBtn"]);
    }

    #[test]
    fn focus_accepts_rendered_ids() {
        let mut surface = MemorySurface::full();
        surface.set_children(
            Slot::CategoriesGrid,
            vec![Element::new("button").attr("id", "cat-core").into()],
        );
        assert!(surface.focus("cat-core"));
        assert_eq!(surface.focused().as_deref(), Some("cat-core"));
        assert!(!surface.focus("cat-missing"));
        assert_eq!(surface.focused().as_deref(), Some("cat-core"));
    }

    #[test]
    fn html_nests_slots() {
        let mut surface = MemorySurface::full();
        surface.set_document_lang(Lang::Ar);
        surface.set_text(Slot::DetailTitle, "القتال");
        let html = surface.to_html();
        assert!(html.starts_with("<html lang=\"ar\" dir=\"rtl\">"));
        let root = html.find("id=\"appRoot\"").unwrap();
        let title = html.find("id=\"detailTitle\"").unwrap();
        let overlay = html.find("id=\"tocOverlay\"").unwrap();
        assert!(root < title && title < overlay);
        assert!(html.contains("<h2 id=\"detailTitle\">القتال</h2>"));
    }

    #[test]
    fn snapshot_serializes_by_id() {
        let mut surface = MemorySurface::landing();
        surface.set_text(Slot::HomeBtn, "Open Categories");
        let json = serde_json::to_value(surface.snapshot()).unwrap();
        assert_eq!(json["slots"]["homeBtn"]["text"], "Open Categories");
        assert_eq!(json["slots"]["homeBtn"]["enabled"], true);
    }
}
