// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open existing PDF documents with `lopdf`, extract page text in
// page order, and read the document information dictionary.

use std::path::Path;

use lopdf::{Dictionary, Document, Object};
use tracing::{debug, info, instrument};
use wandelwerk_core::error::WandelwerkError;

/// Fields of the PDF `/Info` dictionary that Wandelwerk reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    /// Raw `/CreationDate` string (`D:YYYYMMDDHHmmSS...`).
    pub creation_date: Option<String>,
}

/// Reads existing PDF files.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WandelwerkError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            WandelwerkError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, WandelwerkError> {
        let document = Document::load_mem(data).map_err(|err| {
            WandelwerkError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    // -- Extraction -----------------------------------------------------------

    /// Extract the text of every page, one entry per page, in page order.
    #[instrument(skip(self))]
    pub fn page_texts(&self) -> Result<Vec<String>, WandelwerkError> {
        // lopdf pages are keyed by 1-indexed page number in a BTreeMap, so
        // iteration is already in page order.
        let pages = self.document.get_pages();
        let mut texts = Vec::with_capacity(pages.len());

        for page_number in pages.keys() {
            let text = self.document.extract_text(&[*page_number]).map_err(|err| {
                WandelwerkError::PdfError(format!(
                    "failed to extract text from page {}: {}",
                    page_number, err
                ))
            })?;
            debug!(page_number, chars = text.len(), "Page text extracted");
            texts.push(text);
        }

        Ok(texts)
    }

    /// Read the document information dictionary. A document without one
    /// yields all-`None` fields.
    pub fn info(&self) -> PdfInfo {
        let Some(dict) = self.info_dictionary() else {
            debug!("PDF has no /Info dictionary");
            return PdfInfo::default();
        };

        PdfInfo {
            title: self.text_field(dict, b"Title"),
            author: self.text_field(dict, b"Author"),
            creator: self.text_field(dict, b"Creator"),
            producer: self.text_field(dict, b"Producer"),
            creation_date: self.text_field(dict, b"CreationDate"),
        }
    }

    // -- Helpers --------------------------------------------------------------

    fn info_dictionary(&self) -> Option<&Dictionary> {
        let info = self.document.trailer.get(b"Info").ok()?;
        self.resolve(info).as_dict().ok()
    }

    fn text_field(&self, dict: &Dictionary, key: &[u8]) -> Option<String> {
        let value = dict.get(key).ok()?;
        let bytes = self.resolve(value).as_str().ok()?;
        Some(decode_text_string(bytes))
    }

    /// Follow a single indirect reference; anything else is returned as is.
    fn resolve<'a>(&'a self, object: &'a Object) -> &'a Object {
        match object {
            Object::Reference(id) => self.document.get_object(*id).unwrap_or(object),
            other => other,
        }
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a byte-order mark,
/// UTF-8 with its BOM, otherwise one byte per character (PDFDocEncoding
/// agrees with Latin-1 for printable text).
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().map(|&byte| byte as char).collect()
}
