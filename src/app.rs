// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portal controller
//!
//! [`App`] owns the navigation state and wires the content store, the
//! preference store, the history API and the presentation surface
//! together. Every user action is a method; each one leaves the surface
//! consistent with [`NavState`].
//!
//! Loads are split in three steps so a host with real asynchronous I/O can
//! interleave them: [`App::begin_load`], the fetch itself, then
//! [`App::finish_load`]. Only the newest load is ever shown. The
//! synchronous entry points (`start`, `switch_language`, `retry`) run the
//! three steps back to back.

use crate::content::{self, ContentDocument};
use crate::i18n::Lang;
use crate::nav::{NavState, View};
use crate::overlay::{ClickTarget, Key, OverlayController};
use crate::render::chrome::{render_categories, render_picker_links, shell_strings};
use crate::render::render_section_body;
use crate::slug::slugify;
use crate::storage::PreferenceStore;
use crate::store::{ContentSource, ContentStore, LoadError, LoadMode};
use crate::surface::{Slot, Surface};
use crate::url::{self, Navigator};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Handle for a load started by [`App::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub lang: Lang,
    pub mode: LoadMode,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
    /// Served from cache and already applied.
    Ready,
    /// A fetch is needed; hand the result to [`App::finish_load`].
    Pending(LoadTicket),
}

pub struct App<S, P, N, U> {
    store: ContentStore<S>,
    prefs: P,
    navigator: N,
    surface: U,
    overlay: OverlayController,
    state: NavState,
    document: Option<Arc<ContentDocument>>,
    default_lang: Lang,
    generation: u64,
}

impl<S, P, N, U> App<S, P, N, U>
where
    S: ContentSource,
    P: PreferenceStore,
    N: Navigator,
    U: Surface,
{
    pub fn new(source: S, prefs: P, navigator: N, surface: U) -> Self {
        Self {
            store: ContentStore::new(source),
            prefs,
            navigator,
            surface,
            overlay: OverlayController::new(),
            state: NavState::default(),
            document: None,
            default_lang: Lang::default(),
            generation: 0,
        }
    }

    /// Language used when neither the URL nor the stored preference names one.
    pub fn with_default_lang(mut self, lang: Lang) -> Self {
        self.default_lang = lang;
        self
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn lang(&self) -> Lang {
        self.state.lang
    }

    pub fn view(&self) -> View {
        self.state.view(self.surface.has(Slot::AppRoot))
    }

    /// Document currently on screen. `None` before the first load and after
    /// a failed one.
    pub fn document(&self) -> Option<&ContentDocument> {
        self.document.as_deref()
    }

    pub fn store(&self) -> &ContentStore<S> {
        &self.store
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Direct access for hosts that move history themselves (back/forward,
    /// typed URLs). Call [`App::on_hash_change`] afterwards.
    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn surface(&self) -> &U {
        &self.surface
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    // ─── Startup ────────────────────────────────────────────────────────

    /// Resolve the language, load its content and honour any fragment in
    /// the URL. Returns whether content is on screen.
    pub fn start(&mut self) -> bool {
        let lang = self.startup_lang();
        info!(lang = %lang, "starting portal");
        self.state.lang = lang;
        self.persist_lang(lang);
        url::sync_lang(&mut self.navigator, lang);
        self.overlay.sync(&mut self.surface);

        let loaded = self.load_and_apply(lang, LoadMode::Cached);
        if loaded {
            self.open_location_fragment();
        }
        loaded
    }

    /// URL parameter, then stored preference, then the configured default.
    fn startup_lang(&self) -> Lang {
        self.navigator
            .location()
            .lang()
            .or_else(|| self.prefs.read().as_deref().and_then(Lang::from_code))
            .unwrap_or(self.default_lang)
    }

    fn persist_lang(&mut self, lang: Lang) {
        if let Err(err) = self.prefs.write(lang.code()) {
            warn!(lang = %lang, error = %err, "failed to store language preference");
        }
    }

    // ─── Loading ────────────────────────────────────────────────────────

    /// Start loading `lang`. Any load started earlier becomes stale.
    pub fn begin_load(&mut self, lang: Lang, mode: LoadMode) -> LoadStep {
        self.generation += 1;
        if mode == LoadMode::Cached {
            if let Some(doc) = self.store.cached(lang) {
                debug!(lang = %lang, "content served from cache");
                self.apply_document(lang, doc);
                return LoadStep::Ready;
            }
        }
        self.surface.set_enabled(Slot::RetryBtn, false);
        LoadStep::Pending(LoadTicket {
            lang,
            mode,
            generation: self.generation,
        })
    }

    /// Fetch for a pending ticket. Touches neither the cache nor the UI.
    pub fn fetch(&self, ticket: &LoadTicket) -> Result<ContentDocument, LoadError> {
        self.store.fetch(ticket.lang, ticket.mode)
    }

    /// Complete a load. A successful result is always cached; it is only
    /// shown when `ticket` is still the newest load. Returns whether the
    /// result was shown.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<ContentDocument, LoadError>) -> bool {
        let current = ticket.generation == self.generation;
        match result {
            Ok(doc) => {
                let doc = self.store.accept(ticket.lang, doc);
                if !current {
                    debug!(lang = %ticket.lang, "stale load cached but not shown");
                    return false;
                }
                self.apply_document(ticket.lang, doc);
                true
            }
            Err(_) if !current => false,
            Err(_) => {
                self.apply_failure(ticket.lang);
                false
            }
        }
    }

    pub fn load_and_apply(&mut self, lang: Lang, mode: LoadMode) -> bool {
        match self.begin_load(lang, mode) {
            LoadStep::Ready => true,
            LoadStep::Pending(ticket) => {
                let result = self.fetch(&ticket);
                self.finish_load(ticket, result)
            }
        }
    }

    fn apply_document(&mut self, lang: Lang, doc: Arc<ContentDocument>) {
        self.state.lang = lang;
        self.state.last_load_failed = false;
        self.document = Some(doc);
        self.render();
    }

    fn apply_failure(&mut self, lang: Lang) {
        self.state.lang = lang;
        self.state.last_load_failed = true;
        self.document = None;
        self.render();
    }

    // ─── Controls ───────────────────────────────────────────────────────

    pub fn switch_language(&mut self, lang: Lang) -> bool {
        info!(lang = %lang, "switching language");
        self.persist_lang(lang);
        url::sync_lang(&mut self.navigator, lang);
        self.load_and_apply(lang, LoadMode::Cached)
    }

    /// Reload the current language, bypassing every cache.
    pub fn retry(&mut self) -> bool {
        let loaded = self.load_and_apply(self.state.lang, LoadMode::Fresh);
        if loaded && self.state.category.is_none() {
            self.open_location_fragment();
        }
        loaded
    }

    pub fn open_category(&mut self, key: &str, push_hash: bool) {
        debug!(category = key, push = push_hash, "opening category");
        self.state.category = Some(key.to_string());
        self.render();
        if push_hash {
            url::push_fragment(&mut self.navigator, &slugify(key));
        }
        self.surface.focus(Slot::DetailTitle.id());
    }

    pub fn close_category(&mut self) {
        self.state.category = None;
        url::clear_fragment(&mut self.navigator);
        self.render();
    }

    pub fn back(&mut self) {
        self.close_category();
    }

    /// Advance to the next category in TOC order. Only does something while
    /// a category is open.
    pub fn next_category(&mut self) -> bool {
        let Some(current) = self.state.category.as_deref() else {
            return false;
        };
        let next = self
            .document
            .as_deref()
            .and_then(|doc| content::next_category(&doc.toc, Some(current)))
            .map(|entry| entry.key.clone());
        match next {
            Some(key) => {
                self.open_category(&key, true);
                true
            }
            None => false,
        }
    }

    /// Category card in the main grid.
    pub fn select_category(&mut self, key: &str) {
        self.open_category(key, true);
    }

    /// Link in the overlay picker.
    pub fn pick_category(&mut self, key: &str) {
        self.open_category(key, true);
        self.close_overlay();
    }

    /// React to the URL fragment changing underneath us. A fragment that
    /// names no category returns to the grid.
    pub fn on_hash_change(&mut self) {
        if !self.surface.has(Slot::AppRoot) {
            return;
        }
        // Nothing to resolve against yet; leave the fragment for `retry`.
        if self.document.is_none() {
            debug!("hash change ignored until content loads");
            return;
        }
        match self.location_category() {
            Some(key) => self.open_category(&key, false),
            None => self.close_category(),
        }
    }

    fn open_location_fragment(&mut self) {
        if !self.surface.has(Slot::AppRoot) {
            return;
        }
        if let Some(key) = self.location_category() {
            self.open_category(&key, false);
        }
    }

    fn location_category(&self) -> Option<String> {
        let fragment = self.navigator.location().decoded_fragment()?;
        self.document
            .as_deref()?
            .resolve_fragment(&fragment)
            .map(str::to_string)
    }

    pub fn toggle_overlay(&mut self) {
        self.overlay.toggle(&mut self.surface);
        self.commit();
    }

    pub fn close_overlay(&mut self) {
        self.overlay.close(&mut self.surface);
        self.commit();
    }

    pub fn backdrop_click(&mut self, target: ClickTarget) {
        self.overlay.on_backdrop_click(target, &mut self.surface);
        self.commit();
    }

    /// Returns `true` when the overlay consumed the key.
    pub fn key_down(&mut self, key: Key) -> bool {
        let consumed = self.overlay.on_key(key, &mut self.surface);
        self.commit();
        consumed
    }

    /// Activate a control or rendered link by element id, as a click would.
    pub fn activate(&mut self, id: &str) -> bool {
        if let Some(slot) = Slot::from_id(id) {
            match slot {
                Slot::LangEn => {
                    self.switch_language(Lang::En);
                }
                Slot::LangAr => {
                    self.switch_language(Lang::Ar);
                }
                Slot::BackBtn => self.back(),
                Slot::NextCatBtn => return self.next_category(),
                Slot::TocToggle => self.toggle_overlay(),
                Slot::TocClose => self.close_overlay(),
                Slot::RetryBtn => {
                    self.retry();
                }
                _ => return false,
            }
            return true;
        }

        let (picker, slug) = match (id.strip_prefix("toc-"), id.strip_prefix("cat-")) {
            (Some(slug), _) => (true, slug),
            (None, Some(slug)) => (false, slug),
            (None, None) => return false,
        };
        let Some(key) = self
            .document
            .as_deref()
            .and_then(|doc| doc.resolve_fragment(slug))
            .map(str::to_string)
        else {
            return false;
        };
        if picker {
            self.pick_category(&key);
        } else {
            self.select_category(&key);
        }
        true
    }

    /// End of an event: run deferred focus moves and mirror overlay state.
    fn commit(&mut self) {
        self.overlay.after_commit(&mut self.surface);
        self.state.overlay_open = self.overlay.is_open();
    }

    // ─── Rendering ──────────────────────────────────────────────────────

    /// Bring the whole surface in line with the current state.
    pub fn render(&mut self) {
        let has_app = self.surface.has(Slot::AppRoot);
        let lang = self.state.lang;
        let doc = self.document.clone();
        self.render_shell(lang, doc.as_deref(), has_app);
        if !has_app {
            return;
        }

        let surface = &mut self.surface;
        if self.state.last_load_failed {
            surface.set_hidden(Slot::LoadError, false);
            surface.set_enabled(Slot::RetryBtn, true);
            surface.set_hidden(Slot::AppRoot, true);
            return;
        }
        surface.set_hidden(Slot::LoadError, true);
        surface.set_hidden(Slot::AppRoot, false);

        let Some(doc) = doc else {
            return;
        };
        let category = self.state.category.as_deref();
        let dir = lang.direction();
        surface.set_children(Slot::CategoriesGrid, render_categories(&doc, category, dir));
        surface.set_attr(Slot::AppRoot, "data-view", self.state.view(true).as_str());

        let Some(key) = category else {
            surface.set_children(Slot::DetailBody, Vec::new());
            return;
        };
        match doc.section(key) {
            Some(section) => {
                surface.set_text(Slot::DetailTitle, &section.title);
                surface.set_text(Slot::DetailHint, &section.hint);
                surface.set_children(Slot::DetailBody, render_section_body(key, section));
            }
            None => {
                let label = doc.toc_entry(key).map(|e| e.label.as_str()).unwrap_or(key);
                surface.set_text(Slot::DetailTitle, label);
                surface.set_text(Slot::DetailHint, "");
                surface.set_children(Slot::DetailBody, Vec::new());
            }
        }
    }

    fn render_shell(&mut self, lang: Lang, doc: Option<&ContentDocument>, has_app: bool) {
        let strings = shell_strings(lang, doc, !has_app);
        let surface = &mut self.surface;

        surface.set_document_lang(lang);
        surface.set_text(Slot::BrandSubtitle, &strings.brand_subtitle);
        surface.set_text(Slot::PageTitle, &strings.title);
        surface.set_text(Slot::PageSubtitle, &strings.subtitle);
        surface.set_text(Slot::PageDesc, &strings.desc);
        surface.set_text(Slot::HomeBtn, strings.home_button);

        surface.set_text(Slot::CategoriesTitle, strings.categories_title);
        surface.set_text(Slot::CategoriesSubtitle, strings.categories_subtitle);
        surface.set_text(Slot::TocOverlayTitle, strings.overlay_title);
        surface.set_text(Slot::TocToggle, strings.toggle);
        surface.set_text(Slot::TocClose, strings.close);
        surface.set_text(Slot::BackBtn, strings.back);
        surface.set_text(Slot::NextCatBtn, &strings.next);
        surface.set_text(Slot::LoadErrorMessage, strings.load_error);
        surface.set_text(Slot::RetryBtn, strings.retry);

        let arabic = lang == Lang::Ar;
        surface.set_attr(Slot::LangEn, "aria-pressed", if arabic { "false" } else { "true" });
        surface.set_attr(Slot::LangAr, "aria-pressed", if arabic { "true" } else { "false" });

        let links = doc
            .map(|doc| render_picker_links(doc, lang.direction()))
            .unwrap_or_default();
        surface.set_children(Slot::TocGridMobile, links);
    }
}
