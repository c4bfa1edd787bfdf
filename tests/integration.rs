// SPDX-License-Identifier: PMPL-1.0-or-later

//! End-to-end tests against the bundled English and Arabic content

use rules_portal::app::App;
use rules_portal::i18n::Lang;
use rules_portal::nav::View;
use rules_portal::overlay::{ClickTarget, Key};
use rules_portal::render::Node;
use rules_portal::storage::{MemoryPreferences, PreferenceStore};
use rules_portal::store::{DirSource, MemorySource};
use rules_portal::surface::{MemorySurface, Slot, Surface};
use rules_portal::url::{MemoryHistory, Navigator};
use std::fs;
use std::path::{Path, PathBuf};

fn content_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("content")
}

fn bundled(lang: Lang) -> Vec<u8> {
    fs::read(content_dir().join(format!("{}.json", lang.code()))).expect("bundled content should exist")
}

fn portal(url: &str) -> App<DirSource, MemoryPreferences, MemoryHistory, MemorySurface> {
    App::new(
        DirSource::new(content_dir()),
        MemoryPreferences::new(),
        MemoryHistory::new(url),
        MemorySurface::full(),
    )
}

fn classes(nodes: &[Node]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|n| n.as_element())
        .filter_map(|el| el.get_attr("class"))
        .map(str::to_string)
        .collect()
}

#[test]
fn test_combat_fragment_renders_cards_then_warning() {
    let mut app = portal("/index.html#combat");
    assert!(app.start());
    assert_eq!(app.view(), View::Detail);

    let surface = app.surface();
    assert_eq!(surface.text(Slot::DetailTitle), Some("Combat & Action Rules"));
    assert_eq!(surface.text(Slot::DetailHint), Some("Most bans happen here."));

    let body = surface.children(Slot::DetailBody);
    assert_eq!(classes(body), vec!["rulesList", "warning"]);

    let items = body[0].find_by_class("ruleItem");
    assert_eq!(items.len(), 3);
    let badges: Vec<String> = body[0]
        .find_by_class("badge")
        .iter()
        .map(|el| el.get_attr("class").unwrap_or("").to_string())
        .collect();
    assert_eq!(
        badges,
        vec!["badge badge--warn", "badge badge--danger", "badge badge--perma"]
    );
    assert_eq!(body[1].find_by_class("warning__title")[0].text_content(), "Warning");

    // Startup fragments never add history entries.
    assert_eq!(app.navigator().len(), 1);
}

#[test]
fn test_robbery_general_card_and_table() {
    let mut app = portal("/index.html?lang=en#robbery");
    app.start();
    let body = app.surface().children(Slot::DetailBody);
    assert_eq!(classes(body), vec!["rulesList", "tableWrap"]);
    let html = body[1].to_html();
    assert!(html.contains("<th>Heist</th>"));
    assert!(html.contains("<td>Fleeca Bank</td>"));
}

#[test]
fn test_common_rules_bullet_secondary_lines() {
    let mut app = portal("/index.html#common");
    app.start();
    let body = app.surface().children(Slot::DetailBody);
    let secondary = body[0].find_by_class("list__secondary");
    assert_eq!(secondary.len(), 1);
    assert_eq!(
        secondary[0].text_content(),
        "• Keep the last 10 minutes of footage\n• Submit clips within 24 hours of the incident"
    );
}

#[test]
fn test_safe_zones_have_images() {
    let mut app = portal("/index.html#safe");
    app.start();
    let body = app.surface().children(Slot::DetailBody);
    assert_eq!(body[0].find_by_class("safeZone").len(), 6);
    let images = body[0].find_by_class("safeZone__img");
    assert!(images.iter().all(|img| img.get_attr("loading") == Some("lazy")));
}

#[test]
fn test_arabic_failure_then_retry() {
    let source = MemorySource::new().with(Lang::En, bundled(Lang::En));
    let mut app = App::new(
        source,
        MemoryPreferences::with_value("ar"),
        MemoryHistory::new("/index.html#combat"),
        MemorySurface::full(),
    );

    assert!(!app.start());
    assert_eq!(app.lang(), Lang::Ar);
    {
        let surface = app.surface();
        assert!(!surface.is_hidden(Slot::LoadError));
        assert!(surface.is_hidden(Slot::AppRoot));
        assert!(surface.is_enabled(Slot::RetryBtn));
        assert_eq!(surface.attr(Slot::LangAr, "aria-pressed"), Some("true"));
        assert_eq!(surface.lang(), Some(Lang::Ar));
    }

    app.store().source().insert(Lang::Ar, bundled(Lang::Ar));
    assert!(app.retry());

    let surface = app.surface();
    assert!(surface.is_hidden(Slot::LoadError));
    assert!(!surface.is_hidden(Slot::AppRoot));
    assert_eq!(surface.text(Slot::PageTitle), Some("Brotherhood RP – القوانين الرسمية"));
    // The fragment that could not be honoured earlier opens now.
    assert_eq!(surface.text(Slot::DetailTitle), Some("قوانين القتال والأكشن"));
    assert_eq!(surface.text(Slot::NextCatBtn), Some("التالي ←"));
}

#[test]
fn test_language_switch_keeps_category_and_caches() {
    let source = MemorySource::new()
        .with(Lang::En, bundled(Lang::En))
        .with(Lang::Ar, bundled(Lang::Ar));
    let mut app = App::new(
        source,
        MemoryPreferences::new(),
        MemoryHistory::new("/index.html#gang"),
        MemorySurface::full(),
    );
    app.start();
    assert!(app.switch_language(Lang::Ar));
    assert_eq!(app.navigator().location().query_value("lang"), Some("ar"));
    assert_eq!(app.surface().attr(Slot::LangEn, "aria-pressed"), Some("false"));
    assert_eq!(app.state().category.as_deref(), Some("gang"));

    let arrows: Vec<String> = app
        .surface()
        .children(Slot::CategoriesGrid)
        .iter()
        .flat_map(|n| n.find_by_class("catCard__arrow"))
        .map(|el| el.text_content())
        .collect();
    assert!(arrows.iter().all(|a| a == "←"));

    app.switch_language(Lang::En);
    app.switch_language(Lang::Ar);
    assert_eq!(app.store().source().fetch_count(), 2);
    assert_eq!(app.prefs().read().as_deref(), Some("ar"));
}

#[test]
fn test_next_wraps_around_toc() {
    let mut app = portal("/index.html#common");
    app.start();
    assert!(app.next_category());
    assert_eq!(app.state().category.as_deref(), Some("core"));
    assert_eq!(app.navigator().location().fragment.as_deref(), Some("core"));
    let active: Vec<String> = app
        .surface()
        .children(Slot::CategoriesGrid)
        .iter()
        .filter_map(|n| n.as_element())
        .filter(|el| el.has_class("catCard--active"))
        .filter_map(|el| el.get_attr("data-key"))
        .map(str::to_string)
        .collect();
    assert_eq!(active, vec!["core"]);
}

#[test]
fn test_overlay_focus_trap_with_bundled_toc() {
    let mut app = portal("/index.html");
    app.start();
    app.activate("tocToggle");
    assert!(app.state().overlay_open);
    assert!(app.surface().is_scroll_locked());

    let ring = app.surface().focusables(Slot::TocPanel);
    assert_eq!(ring.len(), 9);
    assert_eq!(ring[0], "tocClose");
    assert_eq!(ring[8], "toc-common");

    app.key_down(Key::ShiftTab);
    assert_eq!(app.surface().focused().as_deref(), Some("toc-common"));
    app.key_down(Key::Tab);
    assert_eq!(app.surface().focused().as_deref(), Some("tocClose"));

    app.backdrop_click(ClickTarget::Panel);
    assert!(app.state().overlay_open);
    app.backdrop_click(ClickTarget::Backdrop);
    assert!(!app.state().overlay_open);
    assert!(!app.surface().is_scroll_locked());
}

#[test]
fn test_unavailable_history_still_navigates() {
    let mut app = App::new(
        DirSource::new(content_dir()),
        MemoryPreferences::new(),
        MemoryHistory::unavailable("/index.html"),
        MemorySurface::full(),
    );
    assert!(app.start());
    app.select_category("death");
    assert_eq!(app.view(), View::Detail);
    assert_eq!(app.navigator().location().fragment, None);
    app.back();
    assert_eq!(app.view(), View::List);
}

#[test]
fn test_landing_page_snapshot() {
    let mut app = App::new(
        DirSource::new(content_dir()),
        MemoryPreferences::new(),
        MemoryHistory::new("/?lang=ar"),
        MemorySurface::landing(),
    );
    assert!(app.start());
    assert_eq!(app.view(), View::Home);
    let html = app.surface().to_html();
    assert!(html.starts_with("<html lang=\"ar\" dir=\"rtl\">"));
    assert!(html.contains("الدخول إلى الأقسام"));
    assert!(!html.contains("appRoot"));
}

#[test]
fn test_missing_content_directory_shows_error() {
    let mut app = App::new(
        DirSource::new(content_dir().join("does-not-exist")),
        MemoryPreferences::new(),
        MemoryHistory::new("/index.html"),
        MemorySurface::full(),
    );
    assert!(!app.start());
    assert_eq!(
        app.surface().text(Slot::LoadErrorMessage),
        Some("Couldn't load the rules. Check your connection and try again.")
    );
    assert!(app.document().is_none());
}
