// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// wandelwerk-document — Format codecs and the conversion pipeline.
//
// Provides PDF reading and writing (text extraction, text-cell layout, image
// pages), DOCX reading and writing, raster image handling, metadata
// extraction, the conversion table, and the batch driver that ties them
// together.

pub mod batch;
pub mod convert;
pub mod docx;
pub mod image;
pub mod metadata;
pub mod pdf;

#[cfg(test)]
mod test_fixtures;

// Re-export the primary types so callers can use `wandelwerk_document::PdfReader` etc.
pub use batch::{BatchDriver, BatchOptions, BatchReporter, BatchSummary};
pub use convert::{ConversionSettings, ConversionTable, Outcome, Route};
pub use docx::{CoreProperties, DocxReader, DocxWriter};
pub use image::processor::ImageProcessor;
pub use metadata::extract_metadata;
pub use pdf::reader::PdfReader;
pub use pdf::writer::{PdfWriter, TextLayout};
