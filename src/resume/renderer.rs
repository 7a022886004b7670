use std::io;
use std::io::{BufWriter, ErrorKind, Write};

use printpdf::{BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Rgb};

use crate::resume::layout::PageGeometry;
use crate::resume::metrics::to_builtin_charset;

const BULLET_SEGMENTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Drawing surface for the resume layout. Coordinates are points measured
/// from the top-left corner of the current page; `y` is the text baseline.
pub trait PageRenderer {
    fn new_page(&mut self);
    fn text(&mut self, text: &str, x: f64, y: f64, size: f64, weight: FontWeight);
    fn rule(&mut self, x1: f64, x2: f64, y: f64, thickness: f64);
    fn bullet(&mut self, cx: f64, cy: f64, radius: f64);
}

fn mm(points: f64) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn pdf_error(what: &str, e: impl std::fmt::Debug) -> io::Error {
    io::Error::new(ErrorKind::Other, format!("{}: {:?}", what, e))
}

/// Writes pages with `printpdf` using the builtin Helvetica faces, all black.
pub struct PdfRenderer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    geometry: PageGeometry,
    page_count: usize,
}

impl PdfRenderer {
    pub fn new(title: &str, geometry: PageGeometry) -> io::Result<PdfRenderer> {
        let (doc, page, layer) = PdfDocument::new(title, mm(geometry.width), mm(geometry.height), "Page 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| pdf_error("Error loading Helvetica", e))?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| pdf_error("Error loading Helvetica-Bold", e))?;
        let layer = doc.get_page(page).get_layer(layer);

        let renderer = PdfRenderer {
            doc,
            layer,
            regular,
            bold,
            geometry,
            page_count: 1,
        };
        renderer.reset_colors();
        Ok(renderer)
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    fn reset_colors(&self) {
        self.layer.set_fill_color(black());
        self.layer.set_outline_color(black());
    }

    fn point(&self, x: f64, y: f64) -> Point {
        Point::new(mm(x), mm(self.geometry.height - y))
    }

    pub fn finish(self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        {
            let mut writer = BufWriter::new(&mut buffer);
            self.doc.save(&mut writer).map_err(|e| pdf_error("Error writing PDF", e))?;
            writer.flush()?;
        }
        Ok(buffer)
    }
}

impl PageRenderer for PdfRenderer {
    fn new_page(&mut self) {
        self.page_count += 1;
        let layer_name = format!("Page {}", self.page_count);
        let (page, layer) = self.doc.add_page(mm(self.geometry.width), mm(self.geometry.height), layer_name);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.reset_colors();
    }

    fn text(&mut self, text: &str, x: f64, y: f64, size: f64, weight: FontWeight) {
        let font = match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        };
        self.layer.use_text(to_builtin_charset(text), size, mm(x), mm(self.geometry.height - y), font);
    }

    fn rule(&mut self, x1: f64, x2: f64, y: f64, thickness: f64) {
        let line = Line {
            points: vec![(self.point(x1, y), false), (self.point(x2, y), false)],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        };
        self.layer.set_outline_thickness(thickness);
        self.layer.add_shape(line);
    }

    fn bullet(&mut self, cx: f64, cy: f64, radius: f64) {
        let points = (0..BULLET_SEGMENTS)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / BULLET_SEGMENTS as f64;
                (self.point(cx + radius * angle.cos(), cy + radius * angle.sin()), false)
            })
            .collect();
        let circle = Line {
            points,
            is_closed: true,
            has_fill: true,
            has_stroke: false,
            is_clipping_path: false,
        };
        self.layer.add_shape(circle);
    }
}
