// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX writer — build a minimal WordprocessingML package from pages of
// paragraphs. Each page after the first opens with a page break.

use std::borrow::Cow;
use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::{debug, instrument};
use wandelwerk_core::error::WandelwerkError;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{CORE_PART, CoreProperties, DOCUMENT_PART, WORDPROCESSING_NS, docx_error};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Accumulates pages of paragraphs and serialises them as a `.docx`.
#[derive(Debug, Default)]
pub struct DocxWriter {
    pages: Vec<Vec<String>>,
    properties: CoreProperties,
}

impl DocxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_core_properties(&mut self, properties: CoreProperties) {
        self.properties = properties;
    }

    /// Append a page. An empty page still produces one (empty) paragraph.
    pub fn add_page(&mut self, paragraphs: Vec<String>) {
        self.pages.push(paragraphs);
    }

    /// Serialise the package to bytes.
    #[instrument(skip(self), fields(pages = self.pages.len()))]
    pub fn to_bytes(&self) -> Result<Vec<u8>, WandelwerkError> {
        let document_xml = self.document_xml()?;
        let core_xml = self.core_xml()?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let parts: [(&str, &[u8]); 4] = [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", PACKAGE_RELS.as_bytes()),
            (DOCUMENT_PART, &document_xml),
            (CORE_PART, &core_xml),
        ];
        for (name, contents) in parts {
            zip.start_file(name, options)
                .map_err(|err| docx_error(name, err))?;
            zip.write_all(contents)?;
        }

        let bytes = zip
            .finish()
            .map_err(|err| docx_error("failed to finish package", err))?
            .into_inner();
        debug!(bytes = bytes.len(), "DOCX package written");
        Ok(bytes)
    }

    /// Serialise the package and write it to `path`.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), WandelwerkError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        debug!("Wrote DOCX to {}", path.as_ref().display());
        Ok(())
    }

    // -- Parts ----------------------------------------------------------------

    fn document_xml(&self) -> Result<Vec<u8>, WandelwerkError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        write_declaration(&mut writer)?;

        let mut root = BytesStart::new("w:document");
        root.push_attribute(("xmlns:w", WORDPROCESSING_NS));
        emit(&mut writer, Event::Start(root))?;
        emit(&mut writer, Event::Start(BytesStart::new("w:body")))?;

        for (page_index, page) in self.pages.iter().enumerate() {
            let page_break = page_index > 0;
            if page.is_empty() {
                write_paragraph(&mut writer, "", page_break)?;
                continue;
            }
            for (paragraph_index, text) in page.iter().enumerate() {
                write_paragraph(&mut writer, text, page_break && paragraph_index == 0)?;
            }
        }

        emit(&mut writer, Event::End(BytesEnd::new("w:body")))?;
        emit(&mut writer, Event::End(BytesEnd::new("w:document")))?;
        Ok(writer.into_inner().into_inner())
    }

    fn core_xml(&self) -> Result<Vec<u8>, WandelwerkError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        write_declaration(&mut writer)?;

        let mut root = BytesStart::new("cp:coreProperties");
        root.push_attribute((
            "xmlns:cp",
            "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
        ));
        root.push_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"));
        root.push_attribute(("xmlns:dcterms", "http://purl.org/dc/terms/"));
        root.push_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"));
        emit(&mut writer, Event::Start(root))?;

        if let Some(title) = &self.properties.title {
            write_simple_element(&mut writer, BytesStart::new("dc:title"), title)?;
        }
        if let Some(author) = &self.properties.author {
            write_simple_element(&mut writer, BytesStart::new("dc:creator"), author)?;
        }
        if let Some(created) = &self.properties.created {
            let mut element = BytesStart::new("dcterms:created");
            element.push_attribute(("xsi:type", "dcterms:W3CDTF"));
            write_simple_element(&mut writer, element, created)?;
        }

        emit(&mut writer, Event::End(BytesEnd::new("cp:coreProperties")))?;
        Ok(writer.into_inner().into_inner())
    }
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), WandelwerkError> {
    writer
        .write_event(event)
        .map_err(|err| docx_error("XML serialisation failed", err))
}

fn write_declaration(writer: &mut XmlWriter) -> Result<(), WandelwerkError> {
    emit(
        writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )
}

fn write_simple_element(
    writer: &mut XmlWriter,
    start: BytesStart<'_>,
    value: &str,
) -> Result<(), WandelwerkError> {
    let end = start.to_end().into_owned();
    emit(writer, Event::Start(start))?;
    emit(writer, Event::Text(BytesText::new(&xml_chars(value))))?;
    emit(writer, Event::End(end))
}

/// Drop characters XML 1.0 cannot carry (C0 controls other than tab, line
/// feed and carriage return, plus U+FFFE and U+FFFF). Word refuses packages
/// that contain them.
fn xml_chars(text: &str) -> Cow<'_, str> {
    let allowed = |c: char| {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
    };
    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}

/// `<w:p>[<w:r><w:br w:type="page"/></w:r>]<w:r><w:t>text</w:t></w:r></w:p>`
fn write_paragraph(
    writer: &mut XmlWriter,
    text: &str,
    page_break: bool,
) -> Result<(), WandelwerkError> {
    if text.is_empty() && !page_break {
        return emit(writer, Event::Empty(BytesStart::new("w:p")));
    }

    emit(writer, Event::Start(BytesStart::new("w:p")))?;

    if page_break {
        emit(writer, Event::Start(BytesStart::new("w:r")))?;
        let mut br = BytesStart::new("w:br");
        br.push_attribute(("w:type", "page"));
        emit(writer, Event::Empty(br))?;
        emit(writer, Event::End(BytesEnd::new("w:r")))?;
    }

    if !text.is_empty() {
        emit(writer, Event::Start(BytesStart::new("w:r")))?;
        let mut t = BytesStart::new("w:t");
        t.push_attribute(("xml:space", "preserve"));
        write_simple_element(writer, t, text)?;
        emit(writer, Event::End(BytesEnd::new("w:r")))?;
    }

    emit(writer, Event::End(BytesEnd::new("w:p")))
}
