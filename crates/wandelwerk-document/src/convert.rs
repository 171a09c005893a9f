// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion routines and the table that dispatches to them.
//
// Every supported (source, target) pair maps to exactly one routine. Two pairs
// are known but deliberately unimplemented (DOCX → PDF needs an office suite,
// PDF → image needs a page rasteriser); they resolve to `NotImplemented`
// rather than `Unsupported` so callers can tell a known gap from a request
// that makes no sense.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use tracing::{debug, info, instrument, warn};

use wandelwerk_core::error::{Result, WandelwerkError};
use wandelwerk_core::metadata::parse_pdf_date;
use wandelwerk_core::types::{ConversionPair, ConversionRequest, DocumentFormat, TargetFormat};
use wandelwerk_core::AppConfig;

use crate::docx::{CoreProperties, DocxReader, DocxWriter};
use crate::image::ImageProcessor;
use crate::pdf::{PdfReader, PdfWriter, TextLayout};

/// Codec settings shared by all routines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionSettings {
    pub text_layout: TextLayout,
    pub image_dpi: f32,
}

impl ConversionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            text_layout: TextLayout::from_config(config),
            image_dpi: config.image_dpi,
        }
    }
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Arguments handed to a routine.
#[derive(Debug, Clone, Copy)]
pub struct ConversionJob<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub settings: &'a ConversionSettings,
}

/// A conversion routine: read `job.input`, write `job.output`.
pub type Routine = fn(&ConversionJob<'_>) -> Result<()>;

/// What the table holds for a pair.
#[derive(Debug, Clone, Copy)]
pub enum Route {
    Convert(Routine),
    /// Acknowledged but not implemented; the text explains what is missing.
    NotImplemented(&'static str),
}

/// Result of dispatching one request. Codec failures are `Err`, not an
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Converted {
        output: PathBuf,
    },
    /// No table entry. `from` is the dotted input suffix as given (".md").
    Unsupported {
        from: String,
        to: TargetFormat,
    },
    NotImplemented {
        pair: ConversionPair,
        reason: &'static str,
    },
}

const DOCX_TO_PDF_GAP: &str =
    "DOCX to PDF conversion requires an external office suite such as LibreOffice.";
const PDF_TO_IMAGE_GAP: &str =
    "PDF to image conversion requires a page rasteriser such as poppler.";

static BUILTIN: LazyLock<ConversionTable> = LazyLock::new(ConversionTable::build);

/// Fixed mapping from conversion pair to route.
#[derive(Debug)]
pub struct ConversionTable {
    routes: HashMap<ConversionPair, Route>,
}

impl ConversionTable {
    /// The process-wide table.
    pub fn builtin() -> &'static ConversionTable {
        &BUILTIN
    }

    fn build() -> Self {
        use DocumentFormat as Src;
        use TargetFormat as Dst;

        let entries: [(Src, Dst, Route); 9] = [
            (Src::Pdf, Dst::Docx, Route::Convert(pdf_to_docx)),
            (Src::Pdf, Dst::Txt, Route::Convert(pdf_to_text)),
            (Src::Txt, Dst::Pdf, Route::Convert(text_to_pdf)),
            (Src::Docx, Dst::Md, Route::Convert(docx_to_markdown)),
            (Src::Png, Dst::Pdf, Route::Convert(image_to_pdf)),
            (Src::Jpeg, Dst::Pdf, Route::Convert(image_to_pdf)),
            (Src::Docx, Dst::Pdf, Route::NotImplemented(DOCX_TO_PDF_GAP)),
            (Src::Pdf, Dst::Jpg, Route::NotImplemented(PDF_TO_IMAGE_GAP)),
            (Src::Pdf, Dst::Png, Route::NotImplemented(PDF_TO_IMAGE_GAP)),
        ];

        let routes = entries
            .into_iter()
            .map(|(source, target, route)| (ConversionPair::new(source, target), route))
            .collect();
        Self { routes }
    }

    pub fn route(&self, pair: ConversionPair) -> Option<Route> {
        self.routes.get(&pair).copied()
    }

    /// Every pair with a table entry, implemented or not.
    pub fn pairs(&self) -> impl Iterator<Item = ConversionPair> + '_ {
        self.routes.keys().copied()
    }

    /// Look up the request's pair and run the bound routine.
    #[instrument(skip_all, fields(input = %request.input.path().display(), to = %request.target))]
    pub fn dispatch(
        &self,
        request: &ConversionRequest,
        settings: &ConversionSettings,
    ) -> Result<Outcome> {
        let Some(pair) = request.pair() else {
            return Ok(self.unsupported(request));
        };

        match self.route(pair) {
            Some(Route::Convert(routine)) => {
                info!(
                    %pair,
                    "Conversion started: {} -> {}",
                    request.input.path().display(),
                    request.output.display()
                );
                routine(&ConversionJob {
                    input: request.input.path(),
                    output: &request.output,
                    settings,
                })?;
                Ok(Outcome::Converted {
                    output: request.output.clone(),
                })
            }
            Some(Route::NotImplemented(reason)) => {
                warn!(%pair, "Conversion not implemented: {}", reason);
                Ok(Outcome::NotImplemented { pair, reason })
            }
            None => Ok(self.unsupported(request)),
        }
    }

    fn unsupported(&self, request: &ConversionRequest) -> Outcome {
        let from = request.input.suffix();
        warn!("Unsupported conversion: {} to {}", from, request.target);
        Outcome::Unsupported {
            from,
            to: request.target,
        }
    }
}

// -- Routines -----------------------------------------------------------------

/// Rebuild the PDF's text as DOCX: one paragraph per non-empty line, a page
/// break before every page after the first, Title/Author/CreationDate carried
/// into the core properties.
fn pdf_to_docx(job: &ConversionJob<'_>) -> Result<()> {
    let reader = PdfReader::open(job.input)?;
    let info = reader.info();

    let mut writer = DocxWriter::new();
    writer.set_core_properties(CoreProperties {
        title: info.title,
        author: info.author,
        created: info
            .creation_date
            .as_deref()
            .and_then(parse_pdf_date)
            .map(|date| date.to_rfc3339()),
    });

    for page_text in reader.page_texts()? {
        let paragraphs = page_text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        writer.add_page(paragraphs);
    }

    writer.write_to_file(job.output)?;
    info!(
        "Converted PDF to DOCX: {} -> {}",
        job.input.display(),
        job.output.display()
    );
    Ok(())
}

/// Each page's text followed by a newline, in page order.
fn pdf_to_text(job: &ConversionJob<'_>) -> Result<()> {
    let reader = PdfReader::open(job.input)?;

    let mut text = String::new();
    for page_text in reader.page_texts()? {
        text.push_str(&page_text);
        text.push('\n');
    }

    std::fs::write(job.output, text)?;
    info!(
        "Converted PDF to Text: {} -> {}",
        job.input.display(),
        job.output.display()
    );
    Ok(())
}

/// One trimmed input line per fixed-size cell.
fn text_to_pdf(job: &ConversionJob<'_>) -> Result<()> {
    let content = std::fs::read_to_string(job.input).map_err(|err| {
        if err.kind() == std::io::ErrorKind::InvalidData {
            WandelwerkError::TextError(format!("{} is not valid UTF-8", job.input.display()))
        } else {
            WandelwerkError::Io(err)
        }
    })?;
    let lines: Vec<String> = content.lines().map(|line| line.trim().to_string()).collect();

    let mut writer = PdfWriter::new(job.settings.text_layout);
    if let Some(stem) = job.input.file_stem() {
        writer.set_title(stem.to_string_lossy());
    }
    writer.write_lines_to_file(&lines, job.output)?;

    info!(
        "Converted Text to PDF: {} -> {}",
        job.input.display(),
        job.output.display()
    );
    Ok(())
}

/// Each body paragraph followed by a blank line.
fn docx_to_markdown(job: &ConversionJob<'_>) -> Result<()> {
    let reader = DocxReader::open(job.input)?;

    let markdown: String = reader
        .paragraphs()?
        .iter()
        .map(|paragraph| format!("{paragraph}\n\n"))
        .collect();

    std::fs::write(job.output, markdown)?;
    info!(
        "Converted DOCX to Markdown: {} -> {}",
        job.input.display(),
        job.output.display()
    );
    Ok(())
}

/// Force RGB, then write the container named by the output extension: a
/// single-page PDF for `.pdf`, otherwise whatever raster format the
/// extension names.
fn image_to_pdf(job: &ConversionJob<'_>) -> Result<()> {
    let processor = ImageProcessor::open(job.input)?.into_rgb();

    let wants_pdf = job
        .output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if wants_pdf {
        let mut writer = PdfWriter::new(job.settings.text_layout);
        if let Some(stem) = job.input.file_stem() {
            writer.set_title(stem.to_string_lossy());
        }
        writer.write_rgb_to_file(&processor.into_rgb8(), job.settings.image_dpi, job.output)?;
    } else {
        debug!(output = %job.output.display(), "Output is not a PDF; saving as raster image");
        processor.save(job.output)?;
    }

    info!(
        "Converted Image to PDF: {} -> {}",
        job.input.display(),
        job.output.display()
    );
    Ok(())
}
