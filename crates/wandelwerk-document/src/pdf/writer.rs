// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — create new PDF documents from text lines or raster images using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use image::RgbImage;
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use tracing::{debug, info, instrument};
use wandelwerk_core::error::WandelwerkError;
use wandelwerk_core::{AppConfig, PaperSize};

/// Millimetres per typographic point.
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Geometry of the fixed-size text cells used for text-to-PDF output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    pub paper_size: PaperSize,
    pub font_size_pt: f32,
    /// Only used to flag overlong lines in debug logs.
    pub cell_width_mm: f32,
    pub cell_height_mm: f32,
    /// Left and top margin.
    pub margin_mm: f32,
    /// Page-break trigger distance from the bottom edge.
    pub bottom_margin_mm: f32,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl TextLayout {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            paper_size: config.paper_size,
            font_size_pt: config.text_font_size_pt,
            cell_width_mm: config.text_cell_width_mm,
            cell_height_mm: config.text_cell_height_mm,
            margin_mm: config.text_margin_mm,
            bottom_margin_mm: config.text_bottom_margin_mm,
        }
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    /// How many cells fit between the top margin and the page-break trigger.
    /// Always at least one, so oversized cells still make progress.
    pub fn cells_per_page(&self) -> usize {
        let (_, page_h) = self.page_dimensions();
        let usable = page_h.0 - self.margin_mm - self.bottom_margin_mm;
        ((usable / self.cell_height_mm).floor() as usize).max(1)
    }

    /// Rough number of Helvetica characters that fit inside one cell.
    fn cell_capacity_chars(&self) -> usize {
        let avg_char_width_mm = 0.50 * self.font_size_pt * MM_PER_PT;
        (self.cell_width_mm / avg_char_width_mm) as usize
    }
}

/// Creates new PDF documents from text content or raster images.
pub struct PdfWriter {
    layout: TextLayout,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a new writer with the given text layout.
    pub fn new(layout: TextLayout) -> Self {
        Self {
            layout,
            title: None,
        }
    }

    /// Create a new writer with the default A4 layout.
    pub fn a4() -> Self {
        Self::new(TextLayout::default())
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    // -- Text to PDF ----------------------------------------------------------

    /// Create a PDF with one fixed-size cell per line.
    ///
    /// Lines are drawn as given: nothing is wrapped or reflowed, so a line
    /// wider than its cell runs past the cell edge. Pages break when the next
    /// cell would cross the bottom margin. No lines at all yields one blank
    /// page.
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub fn create_from_lines(&self, lines: &[String]) -> Result<Vec<u8>, WandelwerkError> {
        let layout = &self.layout;
        let (page_w, page_h) = layout.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Wandelwerk Document");

        info!(paper = ?layout.paper_size, title, "Creating text PDF");

        let cells_per_page = layout.cells_per_page();
        let font_size_mm = layout.font_size_pt * MM_PER_PT;
        // Text sits one-tenth of the margin inside the cell's left edge, with
        // its baseline slightly below the vertical centre of the cell.
        let text_x_pt = Mm(layout.margin_mm * 1.1).into_pt().0;
        let baseline_in_cell_mm = 0.5 * layout.cell_height_mm + 0.3 * font_size_mm;

        let overflowing = lines
            .iter()
            .filter(|line| line.chars().count() > layout.cell_capacity_chars())
            .count();
        if overflowing > 0 {
            debug!(overflowing, "Lines wider than their cell are drawn unwrapped");
        }

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::new();

        for chunk in lines.chunks(cells_per_page) {
            let mut ops: Vec<Op> = Vec::new();

            for (cell_idx, line) in chunk.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let cell_top_mm = layout.margin_mm + cell_idx as f32 * layout.cell_height_mm;
                let y_pt = Mm(page_h.0 - cell_top_mm - baseline_in_cell_mm).into_pt().0;

                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(text_x_pt),
                        y: Pt(y_pt),
                    },
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(layout.font_size_pt),
                    font: BuiltinFont::Helvetica,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(line.clone())],
                    font: BuiltinFont::Helvetica,
                });
                ops.push(Op::EndTextSection);
            }

            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        if pages.is_empty() {
            pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        let page_total = pages.len();
        doc.with_pages(pages);

        debug!(total_lines = lines.len(), pages = page_total, "Text layout complete");

        Ok(save_document(&doc))
    }

    // -- Image to PDF ---------------------------------------------------------

    /// Create a single-page PDF whose page is exactly the size of `image`
    /// rendered at `dpi`.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn create_from_rgb(&self, image: &RgbImage, dpi: f32) -> Result<Vec<u8>, WandelwerkError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(WandelwerkError::ImageError("image has no pixels".into()));
        }
        let title = self.title.as_deref().unwrap_or("Wandelwerk Image");
        info!(dpi, title, "Creating image PDF");

        let img_width = image.width() as usize;
        let img_height = image.height() as usize;
        let raw = RawImage {
            pixels: RawImageData::U8(image.as_raw().clone()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        let page_w = Mm(img_width as f32 / dpi * 25.4);
        let page_h = Mm(img_height as f32 / dpi * 25.4);

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: None,
                scale_y: None,
                dpi: Some(dpi),
                rotate: None,
            },
        }];

        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

        debug!(page_w_mm = page_w.0, page_h_mm = page_h.0, "Image placed on page");

        Ok(save_document(&doc))
    }

    // -- File output convenience ----------------------------------------------

    /// Create a text PDF and write it directly to a file.
    pub fn write_lines_to_file(
        &self,
        lines: &[String],
        path: impl AsRef<Path>,
    ) -> Result<(), WandelwerkError> {
        let bytes = self.create_from_lines(lines)?;
        std::fs::write(path.as_ref(), &bytes)?;
        debug!("Wrote text PDF to {}", path.as_ref().display());
        Ok(())
    }

    /// Create an image PDF and write it directly to a file.
    pub fn write_rgb_to_file(
        &self,
        image: &RgbImage,
        dpi: f32,
        path: impl AsRef<Path>,
    ) -> Result<(), WandelwerkError> {
        let bytes = self.create_from_rgb(image, dpi)?;
        std::fs::write(path.as_ref(), &bytes)?;
        debug!("Wrote image PDF to {}", path.as_ref().display());
        Ok(())
    }
}

fn save_document(doc: &PdfDocument) -> Vec<u8> {
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        debug!(warnings = warnings.len(), "printpdf reported warnings");
    }
    output
}
