// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX reader — body paragraphs in document order and core properties.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info, instrument};
use wandelwerk_core::error::WandelwerkError;
use zip::ZipArchive;
use zip::result::ZipError;

use super::{CORE_PART, CoreProperties, DOCUMENT_PART, docx_error};

/// Reads the text content and metadata of a `.docx` package.
///
/// The archive is read once on construction; the XML parts are kept in
/// memory and the file handle is released immediately.
pub struct DocxReader {
    document_xml: String,
    core_xml: Option<String>,
}

impl DocxReader {
    /// Open a DOCX file from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WandelwerkError> {
        let path_ref = path.as_ref();
        info!("Opening DOCX: {}", path_ref.display());

        let file = std::fs::File::open(path_ref)?;
        Self::from_reader(file)
            .map_err(|err| match err {
                WandelwerkError::DocxError(detail) => WandelwerkError::DocxError(format!(
                    "{}: {}",
                    path_ref.display(),
                    detail
                )),
                other => other,
            })
    }

    /// Create a reader from DOCX bytes already in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self, WandelwerkError> {
        Self::from_reader(Cursor::new(data))
    }

    fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, WandelwerkError> {
        let mut archive =
            ZipArchive::new(reader).map_err(|err| docx_error("not a DOCX package", err))?;

        let document_xml = read_part(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| WandelwerkError::DocxError(format!("missing {DOCUMENT_PART}")))?;
        let core_xml = read_part(&mut archive, CORE_PART)?;

        debug!(
            document_bytes = document_xml.len(),
            has_core = core_xml.is_some(),
            "DOCX parts loaded"
        );

        Ok(Self {
            document_xml,
            core_xml,
        })
    }

    /// Text of every body paragraph, in document order.
    ///
    /// Only top-level paragraphs count: paragraphs inside tables and text
    /// boxes are skipped, and runs nested in a text box leave the state of
    /// the enclosing run alone. Runs contribute their `w:t` text, `w:tab` becomes a
    /// tab and `w:br`/`w:cr` a newline. Page and column breaks contribute
    /// nothing.
    pub fn paragraphs(&self) -> Result<Vec<String>, WandelwerkError> {
        let mut reader = Reader::from_str(&self.document_xml);

        let mut paragraphs = Vec::new();
        let mut current = String::new();
        let mut table_depth = 0usize;
        let mut paragraph_depth = 0usize;
        let mut in_run = false;
        let mut in_text = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|err| docx_error("malformed document.xml", err))?;
            let collecting = paragraph_depth == 1 && table_depth == 0;

            match event {
                Event::Start(element) => match element.local_name().as_ref() {
                    b"tbl" => table_depth += 1,
                    b"p" => {
                        paragraph_depth += 1;
                        if paragraph_depth == 1 {
                            current.clear();
                        }
                    }
                    b"r" if collecting => in_run = true,
                    b"t" if collecting && in_run => in_text = true,
                    _ => {}
                },
                Event::Empty(element) => match element.local_name().as_ref() {
                    b"p" if paragraph_depth == 0 && table_depth == 0 => {
                        paragraphs.push(String::new());
                    }
                    b"tab" if collecting && in_run => current.push('\t'),
                    b"br" if collecting && in_run && !is_page_or_column_break(&element) => {
                        current.push('\n');
                    }
                    b"cr" if collecting && in_run => current.push('\n'),
                    _ => {}
                },
                Event::Text(text) if in_text => {
                    let unescaped = text
                        .unescape()
                        .map_err(|err| docx_error("bad text in document.xml", err))?;
                    current.push_str(&unescaped);
                }
                Event::End(element) => match element.local_name().as_ref() {
                    b"tbl" => table_depth = table_depth.saturating_sub(1),
                    b"p" => {
                        if collecting {
                            paragraphs.push(std::mem::take(&mut current));
                        }
                        paragraph_depth = paragraph_depth.saturating_sub(1);
                    }
                    b"r" if collecting => in_run = false,
                    b"t" if collecting => in_text = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        debug!(paragraphs = paragraphs.len(), "DOCX paragraphs read");
        Ok(paragraphs)
    }

    /// Core properties. A package without `docProps/core.xml` yields
    /// all-`None` fields.
    pub fn core_properties(&self) -> Result<CoreProperties, WandelwerkError> {
        let Some(xml) = self.core_xml.as_deref() else {
            debug!("DOCX has no core properties part");
            return Ok(CoreProperties::default());
        };

        let mut reader = Reader::from_str(xml);
        let mut properties = CoreProperties::default();
        let mut field: Option<&'static str> = None;

        loop {
            match reader
                .read_event()
                .map_err(|err| docx_error("malformed core.xml", err))?
            {
                Event::Start(element) => {
                    field = match element.local_name().as_ref() {
                        b"title" => Some("title"),
                        b"creator" => Some("creator"),
                        b"created" => Some("created"),
                        _ => None,
                    };
                }
                Event::Text(text) => {
                    if let Some(name) = field {
                        let value = text
                            .unescape()
                            .map_err(|err| docx_error("bad text in core.xml", err))?
                            .into_owned();
                        let slot = match name {
                            "title" => &mut properties.title,
                            "creator" => &mut properties.author,
                            _ => &mut properties.created,
                        };
                        *slot = Some(value);
                    }
                }
                Event::End(_) => field = None,
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(properties)
    }
}

/// Read one archive member as UTF-8, `None` if the member does not exist.
fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, WandelwerkError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(docx_error(name, err)),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|err| docx_error(name, err))?;
    Ok(Some(xml))
}

fn is_page_or_column_break(element: &BytesStart<'_>) -> bool {
    element.attributes().flatten().any(|attr| {
        attr.key.local_name().as_ref() == b"type"
            && matches!(attr.value.as_ref(), b"page" | b"column")
    })
}
