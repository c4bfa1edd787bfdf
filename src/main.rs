// SPDX-License-Identifier: PMPL-1.0-or-later

//! rules-portal: bilingual (English/Arabic) server rules viewer
//!
//! Renders the portal against a content directory, browses it in the
//! terminal, or checks the content files for structural problems.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rules_portal::app::App;
use rules_portal::config::PortalConfig;
use rules_portal::diagnostics;
use rules_portal::i18n::Lang;
use rules_portal::output::SnapshotFormat;
use rules_portal::storage::{FilePreferences, MemoryPreferences, PreferenceStore};
use rules_portal::store::DirSource;
use rules_portal::surface::MemorySurface;
use rules_portal::tui::PortalTui;
use rules_portal::url::MemoryHistory;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "rules-portal")]
#[command(version)]
#[command(about = "Bilingual rules portal: render, browse and check rule content")]
#[command(long_about = None)]
struct Cli {
    /// Portal config file (YAML or JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding <lang>.json content files
    #[arg(long, global = true, value_name = "DIR")]
    content_dir: Option<PathBuf>,

    /// File the language preference is stored in
    #[arg(long, global = true, value_name = "FILE")]
    preference_file: Option<PathBuf>,

    /// Language used when neither URL nor preference names one (en, ar)
    #[arg(long, global = true)]
    default_lang: Option<Lang>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the portal at a URL and print a surface snapshot
    Render {
        /// Address to render, e.g. "/index.html?lang=ar#combat"
        #[arg(long, default_value = "/index.html")]
        url: String,

        /// Snapshot format (default: from the output extension, else html)
        #[arg(short, long, value_enum)]
        format: Option<SnapshotFormat>,

        /// Render the landing page instead of the full portal
        #[arg(long)]
        landing: bool,

        /// Write the snapshot to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Browse the portal interactively in the terminal
    Browse {
        /// Starting address
        #[arg(long, default_value = "/index.html")]
        url: String,
    },

    /// Check content files for structural problems
    Check {
        /// Content directory (defaults to the configured one)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_tracing(config.log_json);

    match cli.command {
        Commands::Render {
            url,
            format,
            landing,
            output,
        } => {
            // Rendering reads the stored preference but never writes it.
            let stored = FilePreferences::new(&config.preference_file).read();
            let prefs = stored.map(MemoryPreferences::with_value).unwrap_or_default();
            let surface = if landing {
                MemorySurface::landing()
            } else {
                MemorySurface::full()
            };
            let mut app = App::new(
                DirSource::new(&config.content_dir),
                prefs,
                MemoryHistory::new(&url),
                surface,
            )
            .with_default_lang(config.default_lang);

            if !app.start() {
                warn!(url = %url, "content failed to load; snapshot shows the error region");
            }
            info!(view = app.view().as_str(), lang = %app.lang(), "rendered");

            let format = format
                .or_else(|| {
                    output
                        .as_deref()
                        .and_then(|path| path.extension())
                        .and_then(|ext| ext.to_str())
                        .and_then(SnapshotFormat::parse)
                })
                .unwrap_or(SnapshotFormat::Html);
            let snapshot = format.serialize(app.surface())?;
            if let Some(path) = output {
                std::fs::write(&path, snapshot)
                    .with_context(|| format!("writing snapshot {}", path.display()))?;
                println!("Snapshot saved to: {}", path.display());
            } else {
                print!("{}", snapshot);
            }
        }

        Commands::Browse { url } => {
            let mut app = App::new(
                DirSource::new(&config.content_dir),
                FilePreferences::new(&config.preference_file),
                MemoryHistory::new(&url),
                MemorySurface::full(),
            )
            .with_default_lang(config.default_lang);
            app.start();
            PortalTui::run(&mut app)?;
        }

        Commands::Check { dir } => {
            let dir = dir.unwrap_or(config.content_dir);
            diagnostics::run_content_check(&dir)?;
            println!("\nContent check passed.");
        }
    }

    Ok(())
}

/// Config file values with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<PortalConfig> {
    let mut config = PortalConfig::load_or_default(cli.config.as_deref())?;
    if let Some(dir) = &cli.content_dir {
        config.content_dir = dir.clone();
    }
    if let Some(file) = &cli.preference_file {
        config.preference_file = file.clone();
    }
    if let Some(lang) = cli.default_lang {
        config.default_lang = lang;
    }
    config.log_json |= cli.log_json;
    Ok(config)
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Logs go to stderr so snapshots on stdout stay clean.
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
