// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Wandelwerk converter.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WandelwerkError};

/// Formats an input file can be recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Markdown,
    Png,
    Jpeg,
}

impl DocumentFormat {
    /// Infer the format from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            "md" => Some(Self::Markdown),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Txt => "Text",
            Self::Markdown => "Markdown",
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
        };
        f.write_str(name)
    }
}

/// Formats a conversion can be requested into (the `--to` values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Pdf,
    Docx,
    Txt,
    Md,
    Jpg,
    Png,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 6] = [
        Self::Pdf,
        Self::Docx,
        Self::Txt,
        Self::Md,
        Self::Jpg,
        Self::Png,
    ];

    /// Canonical file extension written for this target.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
            Self::Md => "md",
            Self::Jpg => "jpg",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TargetFormat {
    type Err = WandelwerkError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|target| target.extension() == lowered)
            .ok_or_else(|| {
                WandelwerkError::Config(format!(
                    "unknown target format {s:?} (expected one of pdf, docx, txt, md, jpg, png)"
                ))
            })
    }
}

/// An ordered (source, target) tuple identifying one transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversionPair {
    pub source: DocumentFormat,
    pub target: TargetFormat,
}

impl ConversionPair {
    pub const fn new(source: DocumentFormat, target: TargetFormat) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for ConversionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// A user-supplied input path that has been checked to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    path: PathBuf,
    /// Lowercased extension without the leading dot ("" if none).
    extension: String,
    format: Option<DocumentFormat>,
}

impl InputFile {
    /// Validate that `path` exists and detect its format from the extension.
    pub fn validate(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(WandelwerkError::InputNotFound { path });
        }
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let format = DocumentFormat::from_extension(&extension);
        Ok(Self {
            path,
            extension,
            format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        self.format
    }

    /// Dotted lowercase suffix as shown to users, e.g. ".pdf" ("" if none).
    pub fn suffix(&self) -> String {
        if self.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.extension)
        }
    }

    /// File name for display purposes.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// File stem used to build default output names.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string())
    }
}

/// One resolved conversion: which file, into what, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input: InputFile,
    pub target: TargetFormat,
    pub output: PathBuf,
}

impl ConversionRequest {
    /// Resolve the effective output path for `input`.
    ///
    /// An explicit output naming an existing directory receives the default
    /// file name inside it; any other explicit output is used verbatim. With
    /// no explicit output the default name is relative to the working
    /// directory.
    pub fn resolve(input: InputFile, target: TargetFormat, explicit: Option<&Path>) -> Self {
        let default_name = Self::default_file_name(&input, target);
        let output = match explicit {
            Some(dir) if dir.is_dir() => dir.join(default_name),
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(default_name),
        };
        Self {
            input,
            target,
            output,
        }
    }

    /// `<stem>_converted.<target-extension>`.
    pub fn default_file_name(input: &InputFile, target: TargetFormat) -> String {
        format!("{}_converted.{}", input.stem(), target.extension())
    }

    /// The table key for this request, if the source format was recognised.
    pub fn pair(&self) -> Option<ConversionPair> {
        self.input
            .format()
            .map(|source| ConversionPair::new(source, self.target))
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Tabloid => (279, 432),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}
