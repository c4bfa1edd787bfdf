// SPDX-License-Identifier: PMPL-1.0-or-later

//! Navigation state and view derivation

use crate::i18n::Lang;
use serde::Serialize;

/// Which top-level view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Landing page without an application root.
    Home,
    /// Category grid.
    List,
    /// One category's rules.
    Detail,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::List => "list",
            View::Detail => "detail",
        }
    }
}

/// Everything the controller tracks between events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub lang: Lang,
    /// Selected category key. May name a key the current document lacks.
    pub category: Option<String>,
    pub overlay_open: bool,
    pub last_load_failed: bool,
}

impl NavState {
    pub fn new(lang: Lang) -> Self {
        Self {
            lang,
            ..Self::default()
        }
    }

    /// View is derived, never stored.
    pub fn view(&self, has_app: bool) -> View {
        if !has_app {
            View::Home
        } else if self.category.is_some() {
            View::Detail
        } else {
            View::List
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_derivation() {
        let mut state = NavState::new(Lang::Ar);
        assert_eq!(state.view(true), View::List);
        state.category = Some("combat".into());
        assert_eq!(state.view(true), View::Detail);
        assert_eq!(state.view(false), View::Home);
        assert_eq!(View::Detail.as_str(), "detail");
    }
}
