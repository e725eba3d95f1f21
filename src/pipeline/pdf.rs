//! PDF document construction on top of printpdf.
//!
//! The geometry layer: takes headings, [`Block`]s, and staged photos and
//! places them on US-Letter pages with a moving y-cursor, breaking to a new
//! page whenever the next element would cross the bottom margin.
//!
//! printpdf's built-in Helvetica faces carry no glyph-metrics tables, so line
//! wrapping and centring use an average-glyph-width estimate. The estimate is
//! deliberately generous: lines wrap a little early rather than ever spilling
//! past the right margin. Deck copy is short prose, so the slack is
//! invisible in practice.
//!
//! All geometry is `f32`, matching printpdf's `Mm`, font-size, and colour
//! types.

use crate::error::DeckError;
use crate::pipeline::layout::Block;
use printpdf::{
    BuiltinFont, Color, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

// ── Page geometry (US Letter, portrait) ───────────────────────────────────

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;
const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

const MM_PER_INCH: f32 = 25.4;
const PT_PER_MM: f32 = 72.0 / MM_PER_INCH;

/// Baseline-to-baseline distance as a multiple of the font size.
const LINE_SPACING: f32 = 1.25;

/// Average Helvetica glyph advance as a fraction of the font size.
///
/// Generous on purpose (see module docs): real prose averages closer to 0.5.
const AVG_GLYPH_WIDTH: f32 = 0.55;

/// Left indent for bullet lines.
const BULLET_INDENT_MM: f32 = 7.0;

/// Photos render at 4 x 3 inches, left-aligned.
const IMAGE_WIDTH_IN: f32 = 4.0;
const IMAGE_HEIGHT_IN: f32 = 3.0;
const IMAGE_DPI: f32 = 300.0;

// ── Styles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
    Oblique,
}

/// Deck palette: dark blue for headings, medium blue for accents, near-black
/// grey for body text.
fn dark_blue() -> Color {
    rgb(0x1F, 0x49, 0x7D)
}

fn medium_blue() -> Color {
    rgb(0x44, 0x72, 0xC4)
}

fn dark_grey() -> Color {
    rgb(0x32, 0x32, 0x32)
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

// ── Document builder ───────────────────────────────────────────────────────

/// An in-progress deck document.
///
/// Not `Send` (printpdf documents are reference-counted internally), so the
/// whole build runs inside one `spawn_blocking` closure in
/// [`crate::assemble`].
pub struct DeckPdf {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
    /// Top of the unused page area, in mm above the page bottom.
    y_mm: f32,
}

impl DeckPdf {
    /// Start a new US-Letter document titled `title`.
    pub fn new(title: &str) -> Result<Self, DeckError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_err)?;
        let oblique = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(render_err)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            oblique,
            y_mm: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    /// Centred title and subtitle with their trailing spacers.
    pub fn title_block(&mut self, title: &str, subtitle: &str) {
        self.para_centred(title, Face::Bold, 24.0, dark_blue(), 20.0);
        self.space(0.25 * MM_PER_INCH);
        self.para_centred(subtitle, Face::Oblique, 18.0, medium_blue(), 15.0);
        self.space(MM_PER_INCH);
    }

    /// Section heading. Non-first sections get a leading gap, and a heading
    /// is never left alone at the very bottom of a page.
    pub fn section_heading(&mut self, text: &str, first: bool) {
        if !first {
            self.space(0.5 * MM_PER_INCH);
        }
        self.ensure_room(line_height_mm(20.0) + 15.0);
        self.para(text, Face::Bold, 20.0, dark_blue(), 0.0, 15.0);
    }

    /// Render one layout block.
    pub fn push_block(&mut self, block: &Block) {
        match block {
            Block::Emphasis(text) => {
                self.para(text, Face::Bold, 12.0, medium_blue(), 0.0, 10.0);
            }
            Block::Body(text) => {
                self.para(text, Face::Regular, 12.0, dark_grey(), 0.0, 10.0);
            }
            Block::Label(label) => {
                self.para(&format!("{label}:"), Face::Bold, 14.0, medium_blue(), 0.0, 5.0);
            }
            Block::KeyValue { label, value } => {
                self.key_value(label, value, dark_grey(), 0.0, 10.0);
            }
            Block::Bullet(text) => {
                self.para(
                    &format!("• {text}"),
                    Face::Regular,
                    12.0,
                    dark_grey(),
                    BULLET_INDENT_MM,
                    5.0,
                );
            }
            Block::BulletKeyValue { label, value } => {
                self.key_value(&format!("• {label}"), value, dark_grey(), BULLET_INDENT_MM, 5.0);
            }
        }
    }

    /// Embed a staged JPEG at 4 x 3 inches, left-aligned at the cursor.
    ///
    /// Errors are returned as strings so the caller can log and skip; a bad
    /// photo never aborts the document.
    pub fn embed_jpeg(&mut self, path: &Path) -> Result<(), String> {
        let file = File::open(path).map_err(|e| format!("open {}: {e}", path.display()))?;
        let decoder = printpdf::image_crate::codecs::jpeg::JpegDecoder::new(BufReader::new(file))
            .map_err(|e| format!("decode: {e}"))?;
        let image = printpdf::Image::try_from(decoder).map_err(|e| format!("convert: {e}"))?;

        let width_px = image.image.width.0 as f32;
        let height_px = image.image.height.0 as f32;
        if width_px < 1.0 || height_px < 1.0 {
            return Err("image has zero dimension".to_string());
        }

        let height_mm = IMAGE_HEIGHT_IN * MM_PER_INCH;
        self.ensure_room(height_mm + 3.0);
        self.y_mm -= height_mm;

        // Scale from native pixels to the 4x3 box at the staging DPI.
        let transform = ImageTransform {
            translate_x: Some(Mm(MARGIN_MM)),
            translate_y: Some(Mm(self.y_mm)),
            scale_x: Some(IMAGE_WIDTH_IN * IMAGE_DPI / width_px),
            scale_y: Some(IMAGE_HEIGHT_IN * IMAGE_DPI / height_px),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        };
        image.add_to_layer(self.layer.clone(), transform);
        self.y_mm -= 3.0;
        Ok(())
    }

    /// Write the document to `path`. Consumes the builder.
    pub fn save(self, path: &Path) -> Result<(), DeckError> {
        let file = File::create(path).map_err(|e| DeckError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(render_err)
    }

    /// Vertical gap. Never larger than the space left on the page: the next
    /// element's `ensure_room` owns pagination.
    pub fn space(&mut self, mm: f32) {
        self.y_mm = (self.y_mm - mm).max(MARGIN_MM);
    }

    // ── Internals ──────────────────────────────────────────────────────────

    fn ensure_room(&mut self, needed_mm: f32) {
        if self.y_mm - needed_mm < MARGIN_MM {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y_mm = PAGE_HEIGHT_MM - MARGIN_MM;
        debug!("page break");
    }

    fn font(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Oblique => &self.oblique,
        }
    }

    /// Wrapped paragraph at `indent_mm` from the left margin.
    fn para(
        &mut self,
        text: &str,
        face: Face,
        size: f32,
        color: Color,
        indent_mm: f32,
        space_after_pt: f32,
    ) {
        let x = MARGIN_MM + indent_mm;
        let width = CONTENT_WIDTH_MM - indent_mm;
        let lh = line_height_mm(size);
        for line in wrap(text, size, width) {
            self.ensure_room(lh);
            self.y_mm -= lh;
            // Fill colour is layer state; a page break starts a fresh layer,
            // so it must be set per line.
            self.layer.set_fill_color(color.clone());
            self.layer
                .use_text(line.as_str(), size, Mm(x), Mm(self.y_mm), self.font(face));
        }
        self.space(space_after_pt / PT_PER_MM);
    }

    /// Wrapped paragraph with each line centred on the page.
    fn para_centred(&mut self, text: &str, face: Face, size: f32, color: Color, space_after_pt: f32) {
        let lh = line_height_mm(size);
        for line in wrap(text, size, CONTENT_WIDTH_MM) {
            self.ensure_room(lh);
            self.y_mm -= lh;
            let x = ((PAGE_WIDTH_MM - est_width_mm(&line, size)) / 2.0).max(MARGIN_MM);
            self.layer.set_fill_color(color.clone());
            self.layer
                .use_text(line.as_str(), size, Mm(x), Mm(self.y_mm), self.font(face));
        }
        self.space(space_after_pt / PT_PER_MM);
    }

    /// `label: value` line: label in bold, value continuing on the same
    /// baseline and wrapping underneath at the label's indent.
    fn key_value(
        &mut self,
        label: &str,
        value: &str,
        color: Color,
        indent_mm: f32,
        space_after_pt: f32,
    ) {
        let size = 12.0;
        let x = MARGIN_MM + indent_mm;
        let width = CONTENT_WIDTH_MM - indent_mm;
        let label_text = format!("{label}: ");
        let label_w = est_width_mm(&label_text, size);
        let lh = line_height_mm(size);

        self.ensure_room(lh);
        self.y_mm -= lh;
        self.layer.set_fill_color(color.clone());
        self.layer.use_text(
            label_text.as_str(),
            size,
            Mm(x),
            Mm(self.y_mm),
            self.font(Face::Bold),
        );

        let (first, rest) = wrap_with_lead(value, size, width - label_w, width);
        if !first.is_empty() {
            self.layer.set_fill_color(color.clone());
            self.layer.use_text(
                first.as_str(),
                size,
                Mm(x + label_w),
                Mm(self.y_mm),
                self.font(Face::Regular),
            );
        }
        for line in rest {
            self.ensure_room(lh);
            self.y_mm -= lh;
            self.layer.set_fill_color(color.clone());
            self.layer
                .use_text(line.as_str(), size, Mm(x), Mm(self.y_mm), self.font(Face::Regular));
        }
        self.space(space_after_pt / PT_PER_MM);
    }
}

fn render_err(e: impl std::fmt::Display) -> DeckError {
    DeckError::PdfRenderFailed {
        detail: e.to_string(),
    }
}

// ── Text measurement ───────────────────────────────────────────────────────

fn line_height_mm(size_pt: f32) -> f32 {
    size_pt * LINE_SPACING / PT_PER_MM
}

/// Estimated rendered width of `text` at `size_pt`.
fn est_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * AVG_GLYPH_WIDTH / PT_PER_MM
}

/// How many estimated glyphs fit in `width_mm` at `size_pt`. At least 1 so
/// wrapping always makes progress.
fn chars_per_line(width_mm: f32, size_pt: f32) -> usize {
    let chars = width_mm * PT_PER_MM / (size_pt * AVG_GLYPH_WIDTH);
    (chars.floor() as usize).max(1)
}

/// Greedy word wrap against the glyph-width estimate.
///
/// Words longer than a whole line get a line of their own rather than being
/// split mid-word; the estimate's slack absorbs the overhang.
fn wrap(text: &str, size_pt: f32, width_mm: f32) -> Vec<String> {
    let limit = chars_per_line(width_mm, size_pt);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= limit {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap with a shorter first line (the space left after an inline label).
///
/// Returns the first-line text (possibly empty when the label leaves no
/// useful room) and the remaining full-width lines.
fn wrap_with_lead(
    text: &str,
    size_pt: f32,
    first_width_mm: f32,
    rest_width_mm: f32,
) -> (String, Vec<String>) {
    let first_limit = if first_width_mm < 15.0 {
        0
    } else {
        chars_per_line(first_width_mm, size_pt)
    };

    let mut words = text.split_whitespace().peekable();
    let mut first = String::new();
    while let Some(word) = words.peek() {
        let candidate_len = if first.is_empty() {
            word.chars().count()
        } else {
            first.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > first_limit {
            break;
        }
        let word = words.next().unwrap_or_default();
        if !first.is_empty() {
            first.push(' ');
        }
        first.push_str(word);
    }

    let remainder = words.collect::<Vec<_>>().join(" ");
    let rest = if remainder.is_empty() {
        Vec::new()
    } else {
        wrap(&remainder, size_pt, rest_width_mm)
    };
    (first, rest)
}
