// SPDX-License-Identifier: PMPL-1.0-or-later

//! Content document types
//!
//! One [`ContentDocument`] exists per language. The shape mirrors the JSON
//! resources under `content/` (camelCase field names); unknown fields are
//! ignored and every block kind on a section is optional.

use crate::slug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full localized dataset for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    #[serde(default)]
    pub top_subtitle: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub toc: Vec<TocEntry>,
    #[serde(default)]
    pub sections: BTreeMap<String, CategorySection>,
}

/// One navigable category. Order in [`ContentDocument::toc`] is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub key: String,
    pub label: String,
}

impl TocEntry {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// A category's detail content: a bag of optional blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<RuleCard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<Warning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_card: Option<RuleCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<Zone>>,
}

/// A rule with a free-text penalty label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCard {
    pub title: String,
    #[serde(default)]
    pub penalty: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub title: String,
    #[serde(default)]
    pub desc: String,
}

/// Rows are not required to match the header count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Indices of rows whose length differs from the header count.
    pub fn ragged_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.len() != self.headers.len())
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

/// A present block on a section, borrowed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    Cards(&'a [RuleCard]),
    Warning(&'a Warning),
    GeneralCard(&'a RuleCard),
    Table(&'a Table),
    List(&'a [String]),
    Zones(&'a [Zone]),
}

impl Block<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Cards(_) => "cards",
            Block::Warning(_) => "warning",
            Block::GeneralCard(_) => "generalCard",
            Block::Table(_) => "table",
            Block::List(_) => "list",
            Block::Zones(_) => "zones",
        }
    }
}

impl CategorySection {
    /// Present blocks in display order: cards, warning, general card, table,
    /// list, zones.
    pub fn blocks(&self) -> Vec<Block<'_>> {
        let mut blocks = Vec::new();
        if let Some(cards) = &self.cards {
            blocks.push(Block::Cards(cards));
        }
        if let Some(warning) = &self.warning {
            blocks.push(Block::Warning(warning));
        }
        if let Some(card) = &self.general_card {
            blocks.push(Block::GeneralCard(card));
        }
        if let Some(table) = &self.table {
            blocks.push(Block::Table(table));
        }
        if let Some(list) = &self.list {
            blocks.push(Block::List(list));
        }
        if let Some(zones) = &self.zones {
            blocks.push(Block::Zones(zones));
        }
        blocks
    }
}

impl ContentDocument {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn section(&self, key: &str) -> Option<&CategorySection> {
        self.sections.get(key)
    }

    pub fn toc_entry(&self, key: &str) -> Option<&TocEntry> {
        self.toc.iter().find(|entry| entry.key == key)
    }

    /// Resolve a URL fragment to a category key.
    ///
    /// The fragment is lower-cased and compared against the slug of every
    /// key. TOC keys are tried first, in TOC order, so the first TOC entry
    /// wins a slug collision; section keys missing from the TOC come after,
    /// in key order.
    pub fn resolve_fragment(&self, fragment: &str) -> Option<&str> {
        let needle = fragment.trim_start_matches('#').to_lowercase();
        if needle.is_empty() {
            return None;
        }

        if let Some(entry) = self.toc.iter().find(|entry| slug::matches_key(&entry.key, &needle)) {
            return Some(entry.key.as_str());
        }

        self.sections
            .keys()
            .filter(|key| self.toc_entry(key).is_none())
            .find(|key| slug::matches_key(key, &needle))
            .map(String::as_str)
    }

    /// TOC keys that have no section in this document.
    pub fn orphan_toc_keys(&self) -> Vec<&str> {
        self.toc
            .iter()
            .filter(|entry| !self.sections.contains_key(&entry.key))
            .map(|entry| entry.key.as_str())
            .collect()
    }
}

/// Entry following `current` in TOC order, wrapping around.
///
/// An unknown or absent `current` yields the first entry; an empty TOC
/// yields `None`.
pub fn next_category<'a>(toc: &'a [TocEntry], current: Option<&str>) -> Option<&'a TocEntry> {
    let first = toc.first()?;
    let Some(current) = current else {
        return Some(first);
    };
    match toc.iter().position(|entry| entry.key == current) {
        Some(idx) => toc.get((idx + 1) % toc.len()),
        None => Some(first),
    }
}
