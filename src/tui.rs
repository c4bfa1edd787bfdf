// SPDX-License-Identifier: PMPL-1.0-or-later

//! Terminal browser for the rules portal
//!
//! Drives an [`App`] over a [`MemorySurface`] and paints what the
//! controller rendered, so the terminal shows exactly the state a page
//! would.

use crate::app::App;
use crate::i18n::Lang;
use crate::nav::View;
use crate::overlay::Key;
use crate::render::Node;
use crate::storage::PreferenceStore;
use crate::store::ContentSource;
use crate::surface::{MemorySurface, Slot, Surface};
use crate::url::MemoryHistory;
use anyhow::Result;
use colored::*;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};
use std::time::Duration;

pub type BrowseApp<S, P> = App<S, P, MemoryHistory, MemorySurface>;

pub struct PortalTui;

impl PortalTui {
    pub fn run<S: ContentSource, P: PreferenceStore>(app: &mut BrowseApp<S, P>) -> Result<()> {
        terminal::enable_raw_mode()?;
        let result = Self::run_inner(app);
        terminal::disable_raw_mode()?;
        result
    }

    fn run_inner<S: ContentSource, P: PreferenceStore>(app: &mut BrowseApp<S, P>) -> Result<()> {
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        let mut selected = 0;
        let mut scroll = 0;

        loop {
            let screen = build_screen(app, selected);
            Self::render(&mut stdout, &screen, scroll)?;

            if !event::poll(Duration::from_millis(200))? {
                continue;
            }
            let Event::Key(KeyEvent { code, .. }) = event::read()? else {
                continue;
            };

            let count = app.document().map(|doc| doc.toc.len()).unwrap_or(0);
            let overlay_open = app.state().overlay_open;
            let detail = app.view() == View::Detail;

            match code {
                KeyCode::Char('q') => break,
                KeyCode::Esc if overlay_open => {
                    app.key_down(Key::Escape);
                }
                KeyCode::Esc => break,
                KeyCode::Tab if overlay_open => {
                    app.key_down(Key::Tab);
                }
                KeyCode::BackTab if overlay_open => {
                    app.key_down(Key::ShiftTab);
                }
                KeyCode::Char('j') | KeyCode::Down if detail => {
                    scroll = (scroll + 1).min(screen.body.len().saturating_sub(1));
                }
                KeyCode::Char('k') | KeyCode::Up if detail => {
                    scroll = scroll.saturating_sub(1);
                }
                KeyCode::Tab | KeyCode::Char('j') | KeyCode::Down if count > 0 => {
                    selected = (selected + 1) % count;
                }
                KeyCode::BackTab | KeyCode::Char('k') | KeyCode::Up if count > 0 => {
                    selected = (selected + count - 1) % count;
                }
                KeyCode::Enter if overlay_open => {
                    if let Some(id) = app.surface().focused() {
                        app.activate(&id);
                        scroll = 0;
                    }
                }
                KeyCode::Enter if !detail => {
                    let key = app
                        .document()
                        .and_then(|doc| doc.toc.get(selected))
                        .map(|entry| entry.key.clone());
                    if let Some(key) = key {
                        app.select_category(&key);
                        scroll = 0;
                    }
                }
                KeyCode::Char('n') => {
                    app.next_category();
                    scroll = 0;
                }
                KeyCode::Char('b') | KeyCode::Backspace => app.back(),
                KeyCode::Char('l') => {
                    let other = match app.lang() {
                        Lang::En => Lang::Ar,
                        Lang::Ar => Lang::En,
                    };
                    app.switch_language(other);
                }
                KeyCode::Char('c') => app.toggle_overlay(),
                KeyCode::Char('r') => {
                    app.retry();
                }
                KeyCode::Char('[') => {
                    if app.navigator_mut().back().is_some() {
                        app.on_hash_change();
                    }
                }
                KeyCode::Char(']') => {
                    if app.navigator_mut().forward().is_some() {
                        app.on_hash_change();
                    }
                }
                _ => {}
            }

            // Keep the grid cursor on the open category.
            if let Some(current) = app.state().category.as_deref() {
                if let Some(idx) = app
                    .document()
                    .and_then(|doc| doc.toc.iter().position(|entry| entry.key == current))
                {
                    selected = idx;
                }
            }
            selected = selected.min(count.saturating_sub(1));
        }

        Ok(())
    }

    fn render(stdout: &mut impl Write, screen: &Screen, scroll: usize) -> Result<()> {
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        // Raw mode: every line needs an explicit carriage return.
        for line in screen
            .header
            .iter()
            .chain(screen.body.iter().skip(scroll))
            .chain(screen.footer.iter())
        {
            write!(stdout, "{}\r\n", line)?;
        }
        stdout.flush()?;
        Ok(())
    }
}

/// Pre-coloured lines for one frame.
#[derive(Debug, Default)]
pub struct Screen {
    pub header: Vec<String>,
    pub body: Vec<String>,
    pub footer: Vec<String>,
}

/// Compose a frame from the surface the controller rendered.
pub fn build_screen<S: ContentSource, P: PreferenceStore>(app: &BrowseApp<S, P>, selected: usize) -> Screen {
    let surface = app.surface();
    let text = |slot: Slot| surface.text(slot).unwrap_or("").to_string();
    let mut screen = Screen::default();

    screen.header.push(
        format!("{} · {}", text(Slot::PageTitle), text(Slot::BrandSubtitle))
            .bold()
            .cyan()
            .to_string(),
    );
    let subtitle = text(Slot::PageSubtitle);
    if !subtitle.is_empty() {
        screen.header.push(subtitle.dimmed().to_string());
    }
    let lang_marker = |slot: Slot, code: &str| {
        if surface.attr(slot, "aria-pressed") == Some("true") {
            format!("[{}]", code).green().bold().to_string()
        } else {
            code.dimmed().to_string()
        }
    };
    screen.header.push(format!(
        "{} {}",
        lang_marker(Slot::LangEn, "EN"),
        lang_marker(Slot::LangAr, "AR")
    ));
    screen.header.push(String::new());

    if !surface.is_hidden(Slot::LoadError) {
        screen.body.push(text(Slot::LoadErrorMessage).red().to_string());
        screen.body.push(format!("[r] {}", text(Slot::RetryBtn)));
    } else {
        match app.view() {
            View::Home => {
                screen.body.push(text(Slot::PageDesc));
            }
            View::List => {
                screen.body.push(text(Slot::CategoriesTitle).bold().to_string());
                screen.body.push(text(Slot::CategoriesSubtitle).dimmed().to_string());
                screen.body.push(String::new());
                for (idx, card) in surface.children(Slot::CategoriesGrid).iter().enumerate() {
                    let indicator = if idx == selected {
                        "➤".green()
                    } else {
                        " ".normal()
                    };
                    screen.body.push(format!(
                        "{} {} {}",
                        indicator,
                        class_text(card, "catCard__title").bold(),
                        class_text(card, "catCard__desc").dimmed()
                    ));
                }
            }
            View::Detail => {
                screen.body.push(text(Slot::DetailTitle).bold().to_string());
                let hint = text(Slot::DetailHint);
                if !hint.is_empty() {
                    screen.body.push(hint.dimmed().to_string());
                }
                screen.body.push(String::new());
                for block in surface.children(Slot::DetailBody) {
                    screen.body.extend(block.to_plain_text().lines().map(str::to_string));
                    screen.body.push(String::new());
                }
            }
        }
    }

    if app.state().overlay_open {
        let focused = surface.focused();
        let mark = |id: &str| {
            if focused.as_deref() == Some(id) {
                "➤".green()
            } else {
                " ".normal()
            }
        };
        screen.footer.push(String::new());
        screen
            .footer
            .push(format!("── {} ──", text(Slot::TocOverlayTitle)).bold().to_string());
        for link in surface.children(Slot::TocGridMobile) {
            let id = link
                .as_element()
                .and_then(|el| el.get_attr("id"))
                .unwrap_or("");
            screen
                .footer
                .push(format!("{} {}", mark(id), class_text(link, "toc__label")));
        }
        screen.footer.push(format!(
            "{} [{}]",
            mark(Slot::TocClose.id()),
            text(Slot::TocClose)
        ));
    }

    screen.footer.push(String::new());
    screen.footer.push(
        "Controls: [j/k] Move, [Enter] Open, [n] Next, [b] Back, [c] Categories, [l] Language, [[/]] History, [r] Retry, [q] Quit"
            .dimmed()
            .to_string(),
    );
    screen
}

fn class_text(node: &Node, class: &str) -> String {
    node.find_by_class(class)
        .first()
        .map(|el| el.text_content())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryPreferences;
    use crate::store::MemorySource;

    const EN: &str = r#"{
        "title": "Rules",
        "toc": [{"key": "core", "label": "Core"}, {"key": "combat", "label": "Combat"}],
        "sections": {
            "core": {"title": "Core Rules", "hint": "Basics", "list": ["Be respectful"]},
            "combat": {"title": "Combat"}
        }
    }"#;

    fn joined(lines: &[String]) -> String {
        lines.join("\n")
    }

    fn app(url: &str) -> BrowseApp<MemorySource, MemoryPreferences> {
        App::new(
            MemorySource::new().with(Lang::En, EN),
            MemoryPreferences::new(),
            MemoryHistory::new(url),
            MemorySurface::full(),
        )
    }

    #[test]
    fn list_screen_shows_categories() {
        colored::control::set_override(false);
        let mut app = app("/index.html");
        app.start();
        let screen = build_screen(&app, 1);
        let body = joined(&screen.body);
        assert!(body.contains("  Core"));
        assert!(body.contains("➤ Combat"));
    }

    #[test]
    fn detail_screen_shows_plain_blocks() {
        colored::control::set_override(false);
        let mut app = app("/index.html#core");
        app.start();
        let screen = build_screen(&app, 0);
        let body = joined(&screen.body);
        assert!(body.starts_with("Core Rules\nBasics"));
        assert!(body.contains("Be respectful"));
    }

    #[test]
    fn overlay_lists_picker_links_with_focus() {
        colored::control::set_override(false);
        let mut app = app("/index.html");
        app.start();
        app.toggle_overlay();
        app.key_down(Key::Tab);
        let footer = joined(&build_screen(&app, 0).footer);
        assert!(footer.contains("➤ Core"));
        assert!(footer.contains("  [Close]"));
    }

    #[test]
    fn failed_load_shows_retry() {
        colored::control::set_override(false);
        let mut app = App::new(
            MemorySource::new(),
            MemoryPreferences::new(),
            MemoryHistory::new("/"),
            MemorySurface::full(),
        );
        app.start();
        let body = joined(&build_screen(&app, 0).body);
        assert!(body.contains("[r] Retry"));
    }
}
