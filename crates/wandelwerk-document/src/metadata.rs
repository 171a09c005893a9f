// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metadata extraction. Read-only: nothing is written to disk.

use tracing::{debug, instrument};
use wandelwerk_core::error::Result;
use wandelwerk_core::metadata::{MetadataRecord, MetadataValue};
use wandelwerk_core::types::{DocumentFormat, InputFile};

use crate::docx::DocxReader;
use crate::pdf::PdfReader;

/// Build the metadata record for `input`.
///
/// PDF reports Author, Creator, Producer and Created; DOCX reports Author,
/// Created and Title. Every other format yields an empty record.
#[instrument(skip_all, fields(input = %input.path().display()))]
pub fn extract_metadata(input: &InputFile) -> Result<MetadataRecord> {
    let mut record = MetadataRecord::new();

    match input.format() {
        Some(DocumentFormat::Pdf) => {
            let info = PdfReader::open(input.path())?.info();
            record.push("Author", info.author.map(MetadataValue::Text));
            record.push("Creator", info.creator.map(MetadataValue::Text));
            record.push("Producer", info.producer.map(MetadataValue::Text));
            record.push("Created", info.creation_date.map(MetadataValue::from_pdf_date));
        }
        Some(DocumentFormat::Docx) => {
            let properties = DocxReader::open(input.path())?.core_properties()?;
            record.push("Author", properties.author.map(MetadataValue::Text));
            record.push("Created", properties.created.map(MetadataValue::from_w3c_date));
            record.push("Title", properties.title.map(MetadataValue::Text));
        }
        _ => debug!("No metadata reader for {}", input.suffix()),
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;

    #[test]
    fn pdf_fields_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_fixtures::write_file(
            dir.path(),
            "annual.pdf",
            &test_fixtures::pdf_with_info(
                &["Body"],
                &[
                    ("Author", "Grace Hopper"),
                    ("Producer", "Typesetter 2"),
                    ("CreationDate", "D:20230115120000+01'00'"),
                ],
            ),
        );
        let record = extract_metadata(&InputFile::validate(&path).unwrap()).unwrap();

        assert_eq!(
            record.field_names(),
            vec!["Author", "Creator", "Producer", "Created"]
        );
        assert_eq!(
            record.get("Author"),
            Some(&MetadataValue::Text("Grace Hopper".into()))
        );
        assert_eq!(record.get("Creator"), None);
        assert!(matches!(record.get("Created"), Some(MetadataValue::Date(_))));
        assert_eq!(
            record.get("Created").unwrap().to_string(),
            "2023-01-15 12:00:00+01:00"
        );
    }

    #[test]
    fn unparseable_pdf_date_is_kept_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_fixtures::write_file(
            dir.path(),
            "odd.pdf",
            &test_fixtures::pdf_with_info(&["x"], &[("CreationDate", "last tuesday")]),
        );
        let record = extract_metadata(&InputFile::validate(&path).unwrap()).unwrap();
        assert_eq!(
            record.get("Created"),
            Some(&MetadataValue::Text("last tuesday".into()))
        );
    }

    #[test]
    fn docx_fields_in_order() {
        let core = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
  xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/">
  <dc:title>Minutes</dc:title>
  <dcterms:created>2024-03-01T09:30:00Z</dcterms:created>
</cp:coreProperties>"#;
        let body = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p/></w:body></w:document>"#;

        let dir = tempfile::tempdir().unwrap();
        let path = test_fixtures::write_file(
            dir.path(),
            "minutes.docx",
            &test_fixtures::docx_package(body, Some(core)),
        );
        let record = extract_metadata(&InputFile::validate(&path).unwrap()).unwrap();

        assert_eq!(record.field_names(), vec!["Author", "Created", "Title"]);
        assert_eq!(record.get("Author"), None);
        assert_eq!(record.get("Title"), Some(&MetadataValue::Text("Minutes".into())));
        assert_eq!(
            record.get("Created").unwrap().to_string(),
            "2024-03-01 09:30:00+00:00"
        );
    }

    #[test]
    fn other_formats_yield_an_empty_record_and_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_fixtures::write_file(dir.path(), "notes.txt", b"hello");
        let record = extract_metadata(&InputFile::validate(&path).unwrap()).unwrap();

        assert!(record.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn malformed_pdf_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_fixtures::write_file(dir.path(), "bad.pdf", b"not a pdf");
        assert!(extract_metadata(&InputFile::validate(&path).unwrap()).is_err());
    }
}
