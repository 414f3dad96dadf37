use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use serde::Deserialize;

use crate::text::GraphParams;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Text file to visualise. The bundled excerpt is shown when omitted.
    pub file: Option<PathBuf>,

    /// JSON settings file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub word_limit: Option<usize>,

    #[arg(long)]
    pub related_words_limit: Option<usize>,

    #[arg(long)]
    pub scale: Option<f32>,

    /// Pointer hit radius in screen pixels.
    #[arg(long)]
    pub hover_radius: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(flatten)]
    pub params: GraphParams,
    pub hover_radius: f32,
    pub live_layout: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            params: GraphParams::default(),
            hover_radius: 40.0,
            live_layout: true,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid settings in {}", path.display()))
    }

    fn parse(raw: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(raw).context("failed to parse settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults, then the `--config` file, then individual flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(word_limit) = args.word_limit {
            settings.params.word_limit = word_limit;
        }
        if let Some(related_words_limit) = args.related_words_limit {
            settings.params.related_words_limit = related_words_limit;
        }
        if let Some(scale) = args.scale {
            settings.params.scale = scale;
        }
        if let Some(hover_radius) = args.hover_radius {
            settings.hover_radius = hover_radius;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.params.scale.is_finite() && self.params.scale > 0.0,
            "scale must be a positive number, got {}",
            self.params.scale
        );
        ensure!(
            self.hover_radius.is_finite() && self.hover_radius > 0.0,
            "hoverRadius must be a positive number, got {}",
            self.hover_radius
        );
        Ok(())
    }
}
