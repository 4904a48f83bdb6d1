//! A plotters backend that records drawing calls onto a single PDF page.
//!
//! One backend unit is one PDF point. plotters puts the origin at the top left with y
//! growing downwards, PDF at the bottom left with y growing upwards, so every
//! coordinate gets flipped on the way through. Text uses the built-in Helvetica font.
use std::f64::consts::PI;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::info;
use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};
use printpdf::*;

use crate::errors::PlotError;

const MM_PER_PT: f64 = 25.4 / 72.0;
/// Average Helvetica glyph advance as a fraction of the font size
const HELVETICA_ADVANCE: f64 = 0.52;
/// Cap height of Helvetica as a fraction of the font size
const HELVETICA_ASCENT: f64 = 0.72;
const CIRCLE_STEPS: usize = 36;

type PdfResult = Result<(), DrawingErrorKind<PlotError>>;

fn mm(pt: f64) -> Mm {
    Mm((pt * MM_PER_PT) as _)
}

/// printpdf has no alpha on plain fills, so blend against the white page
fn pdf_color(color: BackendColor) -> Color {
    let a = color.alpha.max(0.0).min(1.0);
    let blend = |c: u8| (a * c as f64 + (1.0 - a) * 255.0) / 255.0;
    let (r, g, b) = color.rgb;
    Color::Rgb(Rgb::new(blend(r) as _, blend(g) as _, blend(b) as _, None))
}

fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * HELVETICA_ADVANCE
}

pub struct PdfBackend {
    path: PathBuf,
    size: (u32, u32),
    doc: Option<PdfDocumentReference>,
    layer: PdfLayerReference,
    font: IndirectFontRef,
}

impl PdfBackend {
    /// Creates a one-page document of `size` points. Nothing touches the disk until
    /// `present` is called.
    pub fn new<P: AsRef<Path>>(path: P, size: (u32, u32)) -> Result<Self, PlotError> {
        let (doc, page, layer) = PdfDocument::new(
            "Joint distribution",
            mm(size.0 as f64),
            mm(size.1 as f64),
            "Layer 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PlotError::new(format!("{:?}", e)))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(PdfBackend {
            path: path.as_ref().to_path_buf(),
            size,
            doc: Some(doc),
            layer,
            font,
        })
    }

    fn point(&self, (x, y): (f64, f64)) -> (Point, bool) {
        (Point::new(mm(x), mm(self.size.1 as f64 - y)), false)
    }

    fn shape<I: IntoIterator<Item = (f64, f64)>>(&self, points: I, closed: bool, fill: bool) {
        let points: Vec<_> = points.into_iter().map(|p| self.point(p)).collect();
        if points.len() < 2 {
            return;
        }
        self.layer.add_shape(Line {
            points,
            is_closed: closed,
            has_fill: fill,
            has_stroke: !fill,
            is_clipping_path: false,
        });
    }

    fn stroke_style<S: BackendStyle>(&self, style: &S) -> bool {
        let color = style.color();
        if color.alpha == 0.0 {
            return false;
        }
        self.layer.set_outline_color(pdf_color(color));
        self.layer
            .set_outline_thickness(style.stroke_width().max(1) as f64 as _);
        true
    }

    fn fill_style<S: BackendStyle>(&self, style: &S) -> bool {
        let color = style.color();
        if color.alpha == 0.0 {
            return false;
        }
        self.layer.set_fill_color(pdf_color(color));
        true
    }
}

fn coord((x, y): BackendCoord) -> (f64, f64) {
    (x as f64, y as f64)
}

impl DrawingBackend for PdfBackend {
    type ErrorType = PlotError;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> PdfResult {
        Ok(())
    }

    fn present(&mut self) -> PdfResult {
        let doc = match self.doc.take() {
            Some(doc) => doc,
            None => return Ok(()),
        };
        let file = File::create(&self.path).map_err(|e| {
            DrawingErrorKind::DrawingError(PlotError::new(format!(
                "can't create {}: {}",
                self.path.display(),
                e
            )))
        })?;
        doc.save(&mut BufWriter::new(file)).map_err(|e| {
            DrawingErrorKind::DrawingError(PlotError::new(format!(
                "can't write {}: {:?}",
                self.path.display(),
                e
            )))
        })?;
        info!("Wrote {}", self.path.display());
        Ok(())
    }

    fn draw_pixel(&mut self, point: BackendCoord, color: BackendColor) -> PdfResult {
        if color.alpha == 0.0 {
            return Ok(());
        }
        let (x, y) = coord(point);
        self.layer.set_fill_color(pdf_color(color));
        self.shape(
            vec![(x, y), (x + 1.0, y), (x + 1.0, y + 1.0), (x, y + 1.0)],
            true,
            true,
        );
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> PdfResult {
        if self.stroke_style(style) {
            self.shape(vec![coord(from), coord(to)], false, false);
        }
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> PdfResult {
        let (x0, y0) = coord(upper_left);
        let (x1, y1) = coord(bottom_right);
        let corners = vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
        let ready = if fill {
            self.fill_style(style)
        } else {
            self.stroke_style(style)
        };
        if ready {
            self.shape(corners, true, fill);
        }
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> PdfResult {
        if self.stroke_style(style) {
            self.shape(path.into_iter().map(coord), false, false);
        }
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> PdfResult {
        if self.fill_style(style) {
            self.shape(vert.into_iter().map(coord), true, true);
        }
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> PdfResult {
        let (cx, cy) = coord(center);
        let r = radius as f64;
        let points: Vec<_> = (0..CIRCLE_STEPS)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / CIRCLE_STEPS as f64;
                (cx + r * a.cos(), cy + r * a.sin())
            })
            .collect();
        let ready = if fill {
            self.fill_style(style)
        } else {
            self.stroke_style(style)
        };
        if ready {
            self.shape(points, true, fill);
        }
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        let size = style.size();
        Ok((text_width(text, size).ceil() as u32, size.ceil() as u32))
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> PdfResult {
        let color = style.color();
        if color.alpha == 0.0 || text.is_empty() {
            return Ok(());
        }
        let size = style.size();
        // counter-clockwise rotation in PDF space
        let degrees: f64 = match style.transform() {
            FontTransform::None => 0.0,
            FontTransform::Rotate90 => -90.0,
            FontTransform::Rotate180 => 180.0,
            FontTransform::Rotate270 => 90.0,
        };
        let anchor = style.anchor();
        let along = -text_width(text, size)
            * match anchor.h_pos {
                HPos::Left => 0.0,
                HPos::Center => 0.5,
                HPos::Right => 1.0,
            };
        let up = -size
            * match anchor.v_pos {
                VPos::Top => HELVETICA_ASCENT,
                VPos::Center => HELVETICA_ASCENT / 2.0,
                VPos::Bottom => 0.0,
            };

        // anchor offsets are in the text's own frame; rotate them into the page
        let theta = degrees.to_radians();
        let (sin, cos) = theta.sin_cos();
        let (px, py) = coord(pos);
        let x = px + along * cos - up * sin;
        let y = (self.size.1 as f64 - py) + along * sin + up * cos;

        self.layer.begin_text_section();
        self.layer.set_fill_color(pdf_color(color));
        self.layer.set_font(&self.font, size as _);
        self.layer
            .set_text_matrix(TextMatrix::TranslateRotate(Pt(x as _), Pt(y as _), degrees as _));
        self.layer.write_text(text, &self.font);
        self.layer.end_text_section();
        Ok(())
    }
}
