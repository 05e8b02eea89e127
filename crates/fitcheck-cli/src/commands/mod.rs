// CLI subcommand handlers.
//
// main.rs parses arguments and builds a CommandContext; each module here
// handles one subcommand.

pub mod parse;
pub mod report;
pub mod sheet;
pub mod skills;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use fitcheck_cli::output::OutputFormat;
use fitcheck_cli::terminal::ColorPalette;
use fitcheck_lib::{FitcheckConfig, Pilot, StaticCatalog};

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: FitcheckConfig,
    pub format: OutputFormat,
    pub palette: ColorPalette,
}

impl CommandContext {
    /// Load the item catalog from the configured directory.
    ///
    /// Falls back to the repository fixtures in debug builds when no
    /// directory was configured.
    pub fn load_catalog(&self) -> Result<StaticCatalog> {
        let dir = catalog_dir(self.config.catalog_dir.as_deref()).ok_or_else(|| {
            anyhow::anyhow!(
                "no catalog directory configured; pass --catalog-dir or set {}",
                fitcheck_lib::config::CATALOG_DIR_ENV
            )
        })?;
        let catalog = StaticCatalog::from_dir(&dir)
            .with_context(|| format!("failed to load item catalog from {}", dir.display()))?;
        tracing::debug!(items = catalog.len(), dir = %dir.display(), "loaded item catalog");
        Ok(catalog)
    }

    /// Print `value` as pretty JSON, or `text` when the text format is selected.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json =
                    serde_json::to_string_pretty(value).context("failed to serialize output")?;
                println!("{json}");
            }
            OutputFormat::Text => print!("{}", text()),
        }
        Ok(())
    }
}

fn catalog_dir(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = configured {
        return Some(dir.to_path_buf());
    }
    if cfg!(debug_assertions) {
        let fixture =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/catalog");
        if fixture.exists() {
            return Some(fixture);
        }
    }
    None
}

/// Read an EFT fitting file.
pub fn read_fitting(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read fitting from {}", path.display()))
}

/// Read a JSON array of pilots.
pub fn load_pilots(path: &Path) -> Result<Vec<Pilot>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read pilots from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse pilots from {}", path.display()))
}
