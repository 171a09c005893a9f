// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Console output for the batch driver.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;

use wandelwerk_core::error::WandelwerkError;
use wandelwerk_core::metadata::MetadataRecord;
use wandelwerk_core::types::{ConversionPair, InputFile, TargetFormat};
use wandelwerk_document::BatchReporter;

/// Prints one line per event (several for metadata) to the wrapped writer.
/// Write errors on the console are ignored, as `println!` would panic on them.
pub struct ConsoleReporter<W: Write> {
    out: RefCell<W>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn line(&self, text: std::fmt::Arguments<'_>) {
        let mut out = self.out.borrow_mut();
        let _ = out.write_fmt(text);
        let _ = out.write_all(b"\n");
    }
}

impl<W: Write> BatchReporter for ConsoleReporter<W> {
    fn on_missing_input(&self, path: &Path) {
        self.line(format_args!("File not found: {}", path.display()));
    }

    fn on_metadata(&self, input: &InputFile, record: &MetadataRecord) {
        self.line(format_args!("Metadata for {}:", input.file_name()));
        for (name, value) in record.fields() {
            match value {
                Some(value) => self.line(format_args!("  {name}: {value}")),
                None => self.line(format_args!("  {name}: (not set)")),
            }
        }
    }

    fn on_converted(&self, input: &InputFile, output: &Path) {
        self.line(format_args!(
            "Converted {} -> {}",
            input.file_name(),
            output.display()
        ));
    }

    fn on_unsupported(&self, _input: &InputFile, from: &str, to: TargetFormat) {
        self.line(format_args!("Conversion from {from} to {to} not supported."));
    }

    fn on_not_implemented(&self, input: &InputFile, _pair: ConversionPair, reason: &str) {
        self.line(format_args!(
            "Cannot convert {}: {}",
            input.file_name(),
            reason
        ));
    }

    fn on_failed(&self, input: &InputFile, error: &WandelwerkError) {
        self.line(format_args!(
            "Error converting {}: {}",
            input.file_name(),
            error
        ));
    }
}
