// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Wandelwerk.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Wandelwerk operations.
#[derive(Debug, Error)]
pub enum WandelwerkError {
    // -- Validation --
    #[error("file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Codec errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("DOCX operation failed: {0}")]
    DocxError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("text processing failed: {0}")]
    TextError(String),

    // -- I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WandelwerkError>;
