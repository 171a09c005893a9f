// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WandelwerkError};

/// What the batch driver does when an input path does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingInputPolicy {
    /// Validate every input before processing any; the first missing path
    /// fails the whole invocation.
    #[default]
    Abort,
    /// Report the missing path and carry on with the remaining inputs.
    Skip,
}

/// Converter settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Append-only log file receiving one line per conversion event.
    pub log_file: PathBuf,
    /// Behaviour for inputs that do not exist.
    pub missing_input: MissingInputPolicy,
    /// Page size for PDFs generated from plain text.
    pub paper_size: crate::PaperSize,
    /// Font size of text-to-PDF cells, in points.
    pub text_font_size_pt: f32,
    /// Width of one text cell, in millimetres. Advisory: lines are never
    /// wrapped or clipped to it, it only decides which lines are logged as
    /// wider than their cell.
    pub text_cell_width_mm: f32,
    /// Height of one text cell (one line), in millimetres.
    pub text_cell_height_mm: f32,
    /// Left and top page margin for text PDFs, in millimetres.
    pub text_margin_mm: f32,
    /// A new page starts when the next cell would cross this bottom margin.
    pub text_bottom_margin_mm: f32,
    /// Resolution used to size image-to-PDF pages.
    pub image_dpi: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("conversion.log"),
            missing_input: MissingInputPolicy::Abort,
            paper_size: crate::PaperSize::A4,
            text_font_size_pt: 12.0,
            text_cell_width_mm: 200.0,
            text_cell_height_mm: 10.0,
            text_margin_mm: 10.0,
            text_bottom_margin_mm: 20.0,
            image_dpi: 72.0,
        }
    }
}

impl AppConfig {
    /// Load settings from a JSON file; absent keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            WandelwerkError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make generated pages unusable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("text_font_size_pt", self.text_font_size_pt),
            ("text_cell_width_mm", self.text_cell_width_mm),
            ("text_cell_height_mm", self.text_cell_height_mm),
            ("image_dpi", self.image_dpi),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(WandelwerkError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let margins = [
            ("text_margin_mm", self.text_margin_mm),
            ("text_bottom_margin_mm", self.text_bottom_margin_mm),
        ];
        for (name, value) in margins {
            if !(value.is_finite() && value >= 0.0) {
                return Err(WandelwerkError::Config(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
