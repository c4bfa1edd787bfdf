// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-language content cache
//!
//! Documents are fetched at most once per language and kept for the rest of
//! the session. Only [`LoadMode::Fresh`] replaces a cached entry.

pub mod source;

use crate::content::ContentDocument;
use crate::i18n::Lang;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use source::{ContentSource, DirSource, FetchRequest, MemorySource};

/// Why a content load failed. Callers outside the store treat all variants
/// the same way.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("content resource not found: {0}")]
    Missing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("content is not valid UTF-8")]
    Decode,

    #[error("malformed content document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Serve from cache when possible.
    #[default]
    Cached,
    /// Ignore and replace any cached entry.
    Fresh,
}

pub struct ContentStore<S> {
    source: S,
    cache: HashMap<Lang, Arc<ContentDocument>>,
}

impl<S: ContentSource> ContentStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cached(&self, lang: Lang) -> Option<Arc<ContentDocument>> {
        self.cache.get(&lang).cloned()
    }

    pub fn is_cached(&self, lang: Lang) -> bool {
        self.cache.contains_key(&lang)
    }

    /// Resolve a language to its document, fetching on first access.
    pub fn load(&mut self, lang: Lang, mode: LoadMode) -> Result<Arc<ContentDocument>, LoadError> {
        if mode == LoadMode::Cached {
            if let Some(doc) = self.cached(lang) {
                debug!(lang = %lang, "content cache hit");
                return Ok(doc);
            }
        }
        let doc = self.fetch(lang, mode)?;
        Ok(self.accept(lang, doc))
    }

    /// Fetch and parse without touching the cache.
    pub fn fetch(&self, lang: Lang, mode: LoadMode) -> Result<ContentDocument, LoadError> {
        let request = FetchRequest::new(lang, mode == LoadMode::Fresh);
        info!(lang = %lang, resource = %request.resource, fresh = request.bypass_cache, "fetching content");
        let result = self
            .source
            .fetch(&request)
            .and_then(|bytes| decode_document(&bytes));
        if let Err(err) = &result {
            warn!(lang = %lang, error = %err, "content load failed");
        }
        result
    }

    /// Store a fetched document. Last write wins.
    pub fn accept(&mut self, lang: Lang, doc: ContentDocument) -> Arc<ContentDocument> {
        let doc = Arc::new(doc);
        self.cache.insert(lang, Arc::clone(&doc));
        doc
    }

    pub fn invalidate(&mut self, lang: Lang) {
        self.cache.remove(&lang);
    }
}

/// Decode raw resource bytes into a document. A UTF-8 byte order mark is
/// tolerated; anything that is not UTF-8 is rejected.
pub fn decode_document(bytes: &[u8]) -> Result<ContentDocument, LoadError> {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(LoadError::Decode);
    }
    Ok(ContentDocument::from_json(&text)?)
}
