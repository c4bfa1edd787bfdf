// SPDX-License-Identifier: PMPL-1.0-or-later

//! Content directory checks behind `rules-portal check`.

use crate::content::ContentDocument;
use crate::i18n::Lang;
use crate::slug::slugify;
use crate::store::decode_document;
use anyhow::{anyhow, Context, Result};
use colored::*;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

pub fn run_content_check(dir: &Path) -> Result<()> {
    println!("rules-portal content check: {}", dir.display());

    let checks = check_content_dir(dir)?;

    println!();
    for entry in &checks {
        entry.print();
    }

    let errors = checks
        .iter()
        .filter(|entry| entry.level == Level::Error)
        .count();
    if errors > 0 {
        Err(anyhow!("content check reported {} error(s)", errors))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Warn,
    Error,
}

impl Level {
    fn tag(&self) -> ColoredString {
        match self {
            Level::Ok => "OK".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERR".red().bold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub label: String,
    pub level: Level,
    pub detail: String,
}

impl Diagnostic {
    fn new(label: impl Into<String>, level: Level, detail: String) -> Self {
        Self {
            label: label.into(),
            level,
            detail,
        }
    }

    fn ok(label: impl Into<String>, detail: String) -> Self {
        Self::new(label, Level::Ok, detail)
    }

    fn warning(label: impl Into<String>, detail: String) -> Self {
        Self::new(label, Level::Warn, detail)
    }

    fn error(label: impl Into<String>, detail: String) -> Self {
        Self::new(label, Level::Error, detail)
    }

    fn print(&self) {
        println!("  [{}] {:12} {}", self.level.tag(), self.label, self.detail);
    }
}

/// Inspect every `*.json` file directly under `dir`.
pub fn check_content_dir(dir: &Path) -> Result<Vec<Diagnostic>> {
    if !dir.is_dir() {
        return Err(anyhow!("{} is not a directory", dir.display()));
    }
    let name_pattern = Regex::new(r"^([a-z]{2})\.json$")?;

    let mut checks = Vec::new();
    let mut documents: BTreeMap<Lang, ContentDocument> = BTreeMap::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !entry.file_type().is_file() || !name.ends_with(".json") {
            continue;
        }

        let lang = name_pattern
            .captures(&name)
            .and_then(|caps| caps.get(1))
            .and_then(|code| Lang::from_code(code.as_str()));
        let Some(lang) = lang else {
            checks.push(Diagnostic::warning(
                name,
                "not a supported language resource, ignored".to_string(),
            ));
            continue;
        };

        let bytes = fs::read(entry.path())
            .with_context(|| format!("reading {}", entry.path().display()))?;
        match decode_document(&bytes) {
            Ok(doc) => {
                checks.push(Diagnostic::ok(
                    name.clone(),
                    format!("{} categories, {} sections", doc.toc.len(), doc.sections.len()),
                ));
                checks.extend(check_document(&name, &doc));
                documents.insert(lang, doc);
            }
            Err(err) => checks.push(Diagnostic::error(name, err.to_string())),
        }
    }

    for lang in Lang::all() {
        if !documents.contains_key(lang) {
            checks.push(Diagnostic::error(
                format!("{}.json", lang.code()),
                "missing; this language cannot load".to_string(),
            ));
        }
    }
    checks.extend(check_toc_parity(&documents));

    Ok(checks)
}

/// Structural problems inside one document.
pub fn check_document(label: &str, doc: &ContentDocument) -> Vec<Diagnostic> {
    let mut checks = Vec::new();

    let mut seen = BTreeSet::new();
    for entry in &doc.toc {
        if !seen.insert(entry.key.as_str()) {
            checks.push(Diagnostic::error(
                label,
                format!("duplicate category key '{}' in toc", entry.key),
            ));
        }
    }

    for key in doc.orphan_toc_keys() {
        checks.push(Diagnostic::warning(
            label,
            format!("category '{}' has no section; its detail view is empty", key),
        ));
    }

    let mut by_slug: HashMap<String, &str> = HashMap::new();
    let keys = doc
        .toc
        .iter()
        .map(|entry| entry.key.as_str())
        .chain(doc.sections.keys().map(String::as_str));
    for key in keys {
        let slug = slugify(key);
        if slug.is_empty() {
            checks.push(Diagnostic::error(
                label,
                format!("category key '{}' has an empty slug and cannot be linked", key),
            ));
            continue;
        }
        match by_slug.get(slug.as_str()) {
            Some(first) if *first != key => checks.push(Diagnostic::error(
                label,
                format!(
                    "keys '{}' and '{}' share slug '#{}'; only '{}' is reachable",
                    first, key, slug, first
                ),
            )),
            Some(_) => {}
            None => {
                by_slug.insert(slug, key);
            }
        }
    }

    for (key, section) in &doc.sections {
        if let Some(table) = &section.table {
            for row in table.ragged_rows() {
                checks.push(Diagnostic::warning(
                    label,
                    format!(
                        "section '{}' table row {} has {} cells, header has {}",
                        key,
                        row + 1,
                        table.rows[row].len(),
                        table.headers.len()
                    ),
                ));
            }
        }
    }

    checks
}

fn check_toc_parity(documents: &BTreeMap<Lang, ContentDocument>) -> Vec<Diagnostic> {
    let Some((base_lang, base)) = documents.iter().next() else {
        return Vec::new();
    };
    let base_keys: Vec<&str> = base.toc.iter().map(|e| e.key.as_str()).collect();

    documents
        .iter()
        .skip(1)
        .filter_map(|(lang, doc)| {
            let keys: Vec<&str> = doc.toc.iter().map(|e| e.key.as_str()).collect();
            (keys != base_keys).then(|| {
                Diagnostic::warning(
                    "toc",
                    format!(
                        "{} and {} list different categories or orders",
                        base_lang, lang
                    ),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CategorySection, Table, TocEntry};
    use tempfile::TempDir;

    fn levels(checks: &[Diagnostic]) -> Vec<Level> {
        checks.iter().map(|c| c.level).collect()
    }

    #[test]
    fn duplicate_and_colliding_keys_are_errors() {
        let doc = ContentDocument {
            toc: vec![
                TocEntry::new("safe", "A"),
                TocEntry::new("safe", "B"),
                TocEntry::new("Safe", "C"),
            ],
            ..Default::default()
        };
        let checks = check_document("en.json", &doc);
        let errors = checks.iter().filter(|c| c.level == Level::Error).count();
        assert_eq!(errors, 2);
        assert!(checks.iter().any(|c| c.detail.contains("share slug '#safe'")));
    }

    #[test]
    fn ragged_rows_and_orphans_are_warnings() {
        let mut doc = ContentDocument {
            toc: vec![TocEntry::new("robbery", "Robbery"), TocEntry::new("gang", "Gangs")],
            ..Default::default()
        };
        doc.sections.insert(
            "robbery".into(),
            CategorySection {
                table: Some(Table {
                    headers: vec!["a".into(), "b".into()],
                    rows: vec![vec!["1".into()]],
                }),
                ..Default::default()
            },
        );
        let checks = check_document("en.json", &doc);
        assert_eq!(levels(&checks), vec![Level::Warn, Level::Warn]);
        assert!(checks[1].detail.contains("row 1 has 1 cells"));
    }

    #[test]
    fn directory_scan_reports_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.json"), r#"{"toc": [{"key": "core", "label": "Core"}], "sections": {"core": {}}}"#).unwrap();
        fs::write(dir.path().join("ar.json"), "{broken").unwrap();
        fs::write(dir.path().join("fr.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let checks = check_content_dir(dir.path()).unwrap();
        let by_label = |label: &str| checks.iter().filter(|c| c.label == label).map(|c| c.level).collect::<Vec<_>>();
        // Parse failure, then the missing-language error for the same file.
        assert_eq!(by_label("ar.json"), vec![Level::Error, Level::Error]);
        assert_eq!(by_label("en.json"), vec![Level::Ok]);
        assert_eq!(by_label("fr.json"), vec![Level::Warn]);
        assert!(run_content_check(dir.path()).is_err());
    }

    #[test]
    fn bundled_content_passes() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("content");
        let checks = check_content_dir(&dir).unwrap();
        assert!(
            checks.iter().all(|c| c.level != Level::Error),
            "bundled content has errors: {:?}",
            checks
        );
    }
}
