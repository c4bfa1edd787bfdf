// SPDX-License-Identifier: PMPL-1.0-or-later

//! Address-bar model and the two URL channels
//!
//! - language: `?lang=en|ar`
//! - category: `#<slug>`
//!
//! History mutations go through a [`Navigator`]. Failures there never reach
//! the user: the sync helpers log and carry on, and navigation state is
//! updated regardless.

use crate::i18n::Lang;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Query parameter holding the language code.
pub const LANG_PARAM: &str = "lang";

const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'=')
    .add(b'<')
    .add(b'>');

const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub fragment: Option<String>,
}

impl Location {
    /// Parse `path?query#fragment`. Never fails; malformed pieces are kept
    /// as literally as possible.
    pub fn parse(input: &str) -> Self {
        let (rest, fragment) = match input.split_once('#') {
            Some((rest, frag)) => (rest, Some(frag.to_string())),
            None => (input, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (rest, Vec::new()),
        };
        Self {
            path: path.to_string(),
            query,
            fragment: fragment.filter(|f| !f.is_empty()),
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `lang` parameter, only when it names a supported language.
    pub fn lang(&self) -> Option<Lang> {
        self.query_value(LANG_PARAM).and_then(Lang::from_code)
    }

    pub fn set_query_value(&mut self, key: &str, value: &str) {
        match self.query.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value.to_string(),
            None => self.query.push((key.to_string(), value.to_string())),
        }
    }

    pub fn with_lang(mut self, lang: Lang) -> Self {
        self.set_query_value(LANG_PARAM, lang.code());
        self
    }

    pub fn with_fragment(mut self, fragment: Option<&str>) -> Self {
        self.fragment = fragment
            .map(|f| f.trim_start_matches('#').to_string())
            .filter(|f| !f.is_empty());
        self
    }

    /// Percent-decoded fragment without the leading `#`.
    pub fn decoded_fragment(&self) -> Option<String> {
        self.fragment
            .as_deref()
            .map(|f| percent_decode_str(f).decode_utf8_lossy().into_owned())
            .filter(|f| !f.is_empty())
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        for (idx, (key, value)) in self.query.iter().enumerate() {
            let sep = if idx == 0 { '?' } else { '&' };
            write!(
                f,
                "{}{}={}",
                sep,
                utf8_percent_encode(key, QUERY_VALUE),
                utf8_percent_encode(value, QUERY_VALUE)
            )?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", utf8_percent_encode(fragment, FRAGMENT))?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("history API unavailable")]
    Unavailable,
    #[error("history update rejected: {0}")]
    Rejected(String),
}

/// The surrounding history API.
pub trait Navigator {
    fn location(&self) -> Location;
    /// Add a history entry.
    fn push(&mut self, location: Location) -> Result<(), NavigationError>;
    /// Overwrite the current entry.
    fn replace(&mut self, location: Location) -> Result<(), NavigationError>;
}

impl<N: Navigator + ?Sized> Navigator for Box<N> {
    fn location(&self) -> Location {
        (**self).location()
    }

    fn push(&mut self, location: Location) -> Result<(), NavigationError> {
        (**self).push(location)
    }

    fn replace(&mut self, location: Location) -> Result<(), NavigationError> {
        (**self).replace(location)
    }
}

/// In-process session history with back/forward.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    index: usize,
    available: bool,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: vec![Location::parse(initial)],
            index: 0,
            available: true,
        }
    }

    /// History whose mutations always fail; reads still work.
    pub fn unavailable(initial: &str) -> Self {
        Self {
            available: false,
            ..Self::new(initial)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    /// Step back one entry, returning the new current location.
    pub fn back(&mut self) -> Option<Location> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.entries[self.index].clone())
    }

    pub fn forward(&mut self) -> Option<Location> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index].clone())
    }

    /// Simulate the user editing the fragment directly.
    pub fn navigate(&mut self, url: &str) {
        let location = Location::parse(url);
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }
}

impl Navigator for MemoryHistory {
    fn location(&self) -> Location {
        self.entries[self.index].clone()
    }

    fn push(&mut self, location: Location) -> Result<(), NavigationError> {
        if !self.available {
            return Err(NavigationError::Unavailable);
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
        Ok(())
    }

    fn replace(&mut self, location: Location) -> Result<(), NavigationError> {
        if !self.available {
            return Err(NavigationError::Unavailable);
        }
        self.entries[self.index] = location;
        Ok(())
    }
}

/// Write the language into the query string (replace, no new entry).
pub fn sync_lang(nav: &mut impl Navigator, lang: Lang) -> bool {
    let current = nav.location();
    if current.query_value(LANG_PARAM) == Some(lang.code()) {
        return false;
    }
    swallow("sync language", nav.replace(current.with_lang(lang)))
}

/// Push `#<slug>` as a new history entry unless it is already current.
pub fn push_fragment(nav: &mut impl Navigator, slug: &str) -> bool {
    let current = nav.location();
    if current.fragment.as_deref() == Some(slug) {
        return false;
    }
    swallow("push fragment", nav.push(current.with_fragment(Some(slug))))
}

/// Drop the fragment by replacing the current entry.
pub fn clear_fragment(nav: &mut impl Navigator) -> bool {
    let current = nav.location();
    if current.fragment.is_none() {
        return false;
    }
    swallow("clear fragment", nav.replace(current.with_fragment(None)))
}

fn swallow(action: &str, result: Result<(), NavigationError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            debug!(action = action, error = %err, "history update ignored");
            false
        }
    }
}
