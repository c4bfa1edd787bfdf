// SPDX-License-Identifier: PMPL-1.0-or-later

//! Where content bytes come from.

use super::LoadError;
use crate::i18n::Lang;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One request for a language's content resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub lang: Lang,
    /// Relative resource path, e.g. `en.json`.
    pub resource: String,
    /// Skip any intermediate cache between the store and the origin.
    pub bypass_cache: bool,
}

impl FetchRequest {
    pub fn new(lang: Lang, bypass_cache: bool) -> Self {
        Self {
            lang,
            resource: format!("{}.json", lang.code()),
            bypass_cache,
        }
    }
}

/// Transport for content resources. Implementations report every failure
/// as a [`LoadError`]; the store does not distinguish between them.
pub trait ContentSource {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, LoadError>;
}

impl<S: ContentSource + ?Sized> ContentSource for &S {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, LoadError> {
        (**self).fetch(request)
    }
}

impl<S: ContentSource + ?Sized> ContentSource for Box<S> {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, LoadError> {
        (**self).fetch(request)
    }
}

/// Reads `<root>/<lang>.json` from disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentSource for DirSource {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, LoadError> {
        let path = self.root.join(&request.resource);
        fs::read(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => LoadError::Missing(path.display().to_string()),
            _ => LoadError::Io(err),
        })
    }
}

/// In-memory payloads keyed by language.
///
/// Counts fetches and can be switched into a failing mode, which makes it
/// the source of choice for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySource {
    payloads: RefCell<HashMap<Lang, Vec<u8>>>,
    failing: Cell<bool>,
    fetches: Cell<usize>,
    requests: RefCell<Vec<FetchRequest>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, lang: Lang, payload: impl Into<Vec<u8>>) -> Self {
        self.insert(lang, payload);
        self
    }

    pub fn insert(&self, lang: Lang, payload: impl Into<Vec<u8>>) {
        self.payloads.borrow_mut().insert(lang, payload.into());
    }

    pub fn remove(&self, lang: Lang) {
        self.payloads.borrow_mut().remove(&lang);
    }

    /// While failing, every fetch returns an I/O error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.borrow().clone()
    }
}

impl ContentSource for MemorySource {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, LoadError> {
        self.fetches.set(self.fetches.get() + 1);
        self.requests.borrow_mut().push(request.clone());
        if self.failing.get() {
            return Err(LoadError::Io(std::io::Error::new(
                ErrorKind::ConnectionRefused,
                "content source unavailable",
            )));
        }
        self.payloads
            .borrow()
            .get(&request.lang)
            .cloned()
            .ok_or_else(|| LoadError::Missing(request.resource.clone()))
    }
}
