// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver — run one conversion (or metadata extraction) per input, in
// the order given, with failures isolated to the file that caused them.

use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};
use wandelwerk_core::error::{Result, WandelwerkError};
use wandelwerk_core::metadata::MetadataRecord;
use wandelwerk_core::types::{ConversionPair, ConversionRequest, InputFile, TargetFormat};
use wandelwerk_core::MissingInputPolicy;

use crate::convert::{ConversionSettings, ConversionTable, Outcome};
use crate::metadata::extract_metadata;

/// Receives per-file results as the batch runs.
///
/// Every method has a no-op default, so implementors only override what they
/// display.
pub trait BatchReporter {
    /// An input path did not exist and was skipped.
    fn on_missing_input(&self, path: &Path) {
        let _ = path;
    }

    fn on_metadata(&self, input: &InputFile, record: &MetadataRecord) {
        let _ = (input, record);
    }

    fn on_converted(&self, input: &InputFile, output: &Path) {
        let _ = (input, output);
    }

    /// No routine exists for the pair. `from` is the dotted input suffix.
    fn on_unsupported(&self, input: &InputFile, from: &str, to: TargetFormat) {
        let _ = (input, from, to);
    }

    fn on_not_implemented(&self, input: &InputFile, pair: ConversionPair, reason: &str) {
        let _ = (input, pair, reason);
    }

    /// A codec failed on this input. The batch carries on.
    fn on_failed(&self, input: &InputFile, error: &WandelwerkError) {
        let _ = (input, error);
    }
}

/// Per-invocation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub target: TargetFormat,
    /// Explicit output file or directory.
    pub output: Option<PathBuf>,
    /// Report metadata instead of converting.
    pub metadata_only: bool,
    pub missing_input: MissingInputPolicy,
}

impl BatchOptions {
    pub fn new(target: TargetFormat) -> Self {
        Self {
            target,
            output: None,
            metadata_only: false,
            missing_input: MissingInputPolicy::default(),
        }
    }
}

/// Counts of what happened to each input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub metadata: usize,
    pub unsupported: usize,
    pub not_implemented: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    /// Number of inputs the batch looked at.
    pub fn total(&self) -> usize {
        self.converted
            + self.metadata
            + self.unsupported
            + self.not_implemented
            + self.failed
            + self.skipped
    }
}

/// Runs a list of inputs through the conversion table.
pub struct BatchDriver {
    table: &'static ConversionTable,
    settings: ConversionSettings,
}

impl BatchDriver {
    pub fn new(settings: ConversionSettings) -> Self {
        Self {
            table: ConversionTable::builtin(),
            settings,
        }
    }

    /// Process `inputs` in order.
    ///
    /// Under [`MissingInputPolicy::Abort`] every path is checked before any
    /// work starts and the first missing one is returned as
    /// [`WandelwerkError::InputNotFound`]. Codec failures never end the
    /// batch; they are handed to `reporter.on_failed`.
    #[instrument(skip_all, fields(inputs = inputs.len(), to = %options.target))]
    pub fn run(
        &self,
        inputs: &[PathBuf],
        options: &BatchOptions,
        reporter: &dyn BatchReporter,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        let validated: Vec<Option<InputFile>> = match options.missing_input {
            MissingInputPolicy::Abort => inputs
                .iter()
                .map(|path| InputFile::validate(path).map(Some))
                .collect::<Result<_>>()
                .inspect_err(|err| error!("{}", err))?,
            MissingInputPolicy::Skip => inputs
                .iter()
                .map(|path| match InputFile::validate(path) {
                    Ok(input) => Some(input),
                    Err(err) => {
                        error!("{}", err);
                        reporter.on_missing_input(path);
                        summary.skipped += 1;
                        None
                    }
                })
                .collect(),
        };

        for input in validated.iter().flatten() {
            info!(format = ?input.format(), "File validated: {}", input.path().display());
        }

        if !options.metadata_only {
            warn_on_shared_output(options, validated.iter().flatten().count());
        }

        for input in validated.into_iter().flatten() {
            if options.metadata_only {
                self.report_metadata(input, reporter, &mut summary);
            } else {
                self.convert_one(input, options, reporter, &mut summary);
            }
        }

        info!(
            converted = summary.converted,
            failed = summary.failed,
            unsupported = summary.unsupported,
            not_implemented = summary.not_implemented,
            "Batch finished"
        );
        Ok(summary)
    }

    fn report_metadata(
        &self,
        input: InputFile,
        reporter: &dyn BatchReporter,
        summary: &mut BatchSummary,
    ) {
        match extract_metadata(&input) {
            Ok(record) => {
                reporter.on_metadata(&input, &record);
                summary.metadata += 1;
            }
            Err(err) => {
                error!("Error reading metadata from {}: {}", input.file_name(), err);
                reporter.on_failed(&input, &err);
                summary.failed += 1;
            }
        }
    }

    fn convert_one(
        &self,
        input: InputFile,
        options: &BatchOptions,
        reporter: &dyn BatchReporter,
        summary: &mut BatchSummary,
    ) {
        let request = ConversionRequest::resolve(input, options.target, options.output.as_deref());

        match self.table.dispatch(&request, &self.settings) {
            Ok(Outcome::Converted { output }) => {
                reporter.on_converted(&request.input, &output);
                summary.converted += 1;
            }
            Ok(Outcome::Unsupported { from, to }) => {
                reporter.on_unsupported(&request.input, &from, to);
                summary.unsupported += 1;
            }
            Ok(Outcome::NotImplemented { pair, reason }) => {
                reporter.on_not_implemented(&request.input, pair, reason);
                summary.not_implemented += 1;
            }
            Err(err) => {
                error!("Error converting {}: {}", request.input.file_name(), err);
                reporter.on_failed(&request.input, &err);
                summary.failed += 1;
            }
        }
    }
}

/// Several inputs written to one explicit file overwrite each other; only
/// the last survives.
fn warn_on_shared_output(options: &BatchOptions, input_count: usize) {
    if let Some(output) = &options.output {
        if input_count > 1 && !output.is_dir() {
            warn!(
                "{} inputs share the output file {}; each conversion overwrites the previous one",
                input_count,
                output.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;
    use std::cell::RefCell;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// In-memory sink for formatted log lines.
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl LogCapture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Captures reporter calls as short strings.
    #[derive(Default)]
    struct RecordingReporter {
        events: RefCell<Vec<String>>,
    }

    impl RecordingReporter {
        fn events(&self) -> Vec<String> {
            self.events.borrow().clone()
        }

        fn record(&self, event: String) {
            self.events.borrow_mut().push(event);
        }
    }

    impl BatchReporter for RecordingReporter {
        fn on_missing_input(&self, path: &Path) {
            self.record(format!("missing {}", path.display()));
        }

        fn on_metadata(&self, input: &InputFile, record: &MetadataRecord) {
            self.record(format!("metadata {} {}", input.file_name(), record.len()));
        }

        fn on_converted(&self, input: &InputFile, _output: &Path) {
            self.record(format!("converted {}", input.file_name()));
        }

        fn on_unsupported(&self, input: &InputFile, from: &str, to: TargetFormat) {
            self.record(format!("unsupported {} {} {}", input.file_name(), from, to));
        }

        fn on_not_implemented(&self, input: &InputFile, _pair: ConversionPair, _reason: &str) {
            self.record(format!("not-implemented {}", input.file_name()));
        }

        fn on_failed(&self, input: &InputFile, _error: &WandelwerkError) {
            self.record(format!("failed {}", input.file_name()));
        }
    }

    fn options(target: TargetFormat, output: &Path) -> BatchOptions {
        BatchOptions {
            output: Some(output.to_path_buf()),
            ..BatchOptions::new(target)
        }
    }

    #[test]
    fn malformed_middle_file_fails_alone() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let inputs = vec![
            test_fixtures::write_file(dir.path(), "a.pdf", &test_fixtures::pdf_with_pages(&["A"])),
            test_fixtures::write_file(dir.path(), "b.pdf", b"%PDF-1.7 truncated"),
            test_fixtures::write_file(dir.path(), "c.pdf", &test_fixtures::pdf_with_pages(&["C"])),
        ];

        let reporter = RecordingReporter::default();
        let summary = BatchDriver::new(ConversionSettings::default())
            .run(&inputs, &options(TargetFormat::Txt, out.path()), &reporter)
            .unwrap();

        assert_eq!(
            reporter.events(),
            vec!["converted a.pdf", "failed b.pdf", "converted c.pdf"]
        );
        assert_eq!((summary.converted, summary.failed), (2, 1));
        assert!(out.path().join("a_converted.txt").exists());
        assert!(out.path().join("c_converted.txt").exists());
    }

    #[test]
    fn validation_and_conversion_start_are_logged_at_info() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let inputs = vec![test_fixtures::write_file(dir.path(), "notes.txt", b"hello")];

        let capture = LogCapture::default();
        let sink = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            BatchDriver::new(ConversionSettings::default())
                .run(&inputs, &options(TargetFormat::Pdf, out.path()), &RecordingReporter::default())
                .unwrap();
        });

        let log = capture.contents();
        let validated = log.find("File validated:").expect("validation line");
        let started = log.find("Conversion started:").expect("start line");
        let finished = log.find("Converted Text to PDF:").expect("completion line");
        assert!(validated < started && started < finished);
        for line in log.lines().filter(|line| line.contains("notes.txt")) {
            assert!(line.contains("INFO"), "unexpected level in {line:?}");
        }
    }

    #[test]
    fn abort_policy_validates_before_running_anything() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let inputs = vec![
            test_fixtures::write_file(dir.path(), "notes.txt", b"hello"),
            dir.path().join("ghost.pdf"),
        ];

        let reporter = RecordingReporter::default();
        let result = BatchDriver::new(ConversionSettings::default()).run(
            &inputs,
            &options(TargetFormat::Pdf, out.path()),
            &reporter,
        );

        assert!(matches!(result, Err(WandelwerkError::InputNotFound { .. })));
        assert!(reporter.events().is_empty());
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn skip_policy_reports_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let ghost = dir.path().join("ghost.pdf");
        let inputs = vec![
            ghost.clone(),
            test_fixtures::write_file(dir.path(), "notes.txt", b"hello"),
        ];

        let reporter = RecordingReporter::default();
        let batch_options = BatchOptions {
            missing_input: MissingInputPolicy::Skip,
            ..options(TargetFormat::Pdf, out.path())
        };
        let summary = BatchDriver::new(ConversionSettings::default())
            .run(&inputs, &batch_options, &reporter)
            .unwrap();

        assert_eq!(
            reporter.events(),
            vec![format!("missing {}", ghost.display()), "converted notes.txt".to_string()]
        );
        assert_eq!((summary.skipped, summary.converted), (1, 1));
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn metadata_mode_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            test_fixtures::write_file(
                dir.path(),
                "a.pdf",
                &test_fixtures::pdf_with_info(&["A"], &[("Author", "Ada")]),
            ),
            test_fixtures::write_file(dir.path(), "b.txt", b"plain"),
        ];

        let reporter = RecordingReporter::default();
        let batch_options = BatchOptions {
            metadata_only: true,
            output: Some(dir.path().to_path_buf()),
            ..BatchOptions::new(TargetFormat::Docx)
        };
        let summary = BatchDriver::new(ConversionSettings::default())
            .run(&inputs, &batch_options, &reporter)
            .unwrap();

        assert_eq!(reporter.events(), vec!["metadata a.pdf 4", "metadata b.txt 0"]);
        assert_eq!(summary.metadata, 2);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn unsupported_and_unimplemented_pairs_are_reported_not_failed() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let inputs = vec![
            test_fixtures::write_file(dir.path(), "readme.md", b"# Title"),
            test_fixtures::write_file(dir.path(), "scan.pdf", &test_fixtures::pdf_with_pages(&["x"])),
        ];

        let reporter = RecordingReporter::default();
        let summary = BatchDriver::new(ConversionSettings::default())
            .run(&inputs, &options(TargetFormat::Png, out.path()), &reporter)
            .unwrap();

        assert_eq!(
            reporter.events(),
            vec!["unsupported readme.md .md png", "not-implemented scan.pdf"]
        );
        assert_eq!(summary.failed, 0);
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
