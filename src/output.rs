// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for rendered surface snapshots

use crate::surface::MemorySurface;
use anyhow::Result;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SnapshotFormat {
    Html,
    Json,
    Yaml,
}

impl SnapshotFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(SnapshotFormat::Html),
            "json" => Some(SnapshotFormat::Json),
            "yaml" | "yml" => Some(SnapshotFormat::Yaml),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SnapshotFormat::Html => "html",
            SnapshotFormat::Json => "json",
            SnapshotFormat::Yaml => "yaml",
        }
    }

    pub fn serialize(&self, surface: &MemorySurface) -> Result<String> {
        match self {
            SnapshotFormat::Html => Ok(format!("<!DOCTYPE html>\n{}\n", surface.to_html())),
            SnapshotFormat::Json => Ok(serde_json::to_string_pretty(&surface.snapshot())?),
            SnapshotFormat::Yaml => Ok(serde_yaml::to_string(&surface.snapshot())?),
        }
    }
}
