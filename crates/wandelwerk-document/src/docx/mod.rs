// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX module — read and write WordprocessingML packages (a zip archive of
// XML parts) with `zip` and `quick-xml`.

pub mod reader;
pub mod writer;

pub use reader::DocxReader;
pub use writer::DocxWriter;

use wandelwerk_core::error::WandelwerkError;

/// Main document part inside the package.
pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
/// Core properties part (author, title, timestamps).
pub(crate) const CORE_PART: &str = "docProps/core.xml";

pub(crate) const WORDPROCESSING_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Document-level metadata stored in `docProps/core.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreProperties {
    /// `dc:title`
    pub title: Option<String>,
    /// `dc:creator`
    pub author: Option<String>,
    /// `dcterms:created`, raw W3CDTF text.
    pub created: Option<String>,
}

impl CoreProperties {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.created.is_none()
    }
}

pub(crate) fn docx_error(context: &str, err: impl std::fmt::Display) -> WandelwerkError {
    WandelwerkError::DocxError(format!("{context}: {err}"))
}
