use crate::core::fonts::{FontResolver, FontSource};
use crate::domain::model::{
    card_file_name, pt_to_mm, Banner, CardLayout, FontStyle, LayoutSettings, LineSegment,
    PlacedLine, Rect, RenderedCard,
};
use crate::utils::error::{BingoError, Result};
use printpdf::{
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point,
};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

/// Draws a `CardLayout` onto a single PDF page.
pub struct DocumentRenderer<F: FontResolver> {
    fonts: F,
    settings: LayoutSettings,
}

impl<F: FontResolver> DocumentRenderer<F> {
    pub fn new(fonts: F, settings: LayoutSettings) -> Self {
        Self { fonts, settings }
    }

    pub fn render(&self, layout: &CardLayout) -> Result<RenderedCard> {
        let page = self.settings.page;
        let (doc, page_index, layer_index) = PdfDocument::new(
            layout.title.line.text.clone(),
            Mm(pt_to_mm(page.width)),
            Mm(pt_to_mm(page.height)),
            format!("Card {}", layout.card_number),
        );

        let fonts = self.register_fonts(&doc, layout)?;
        let layer = doc.get_page(page_index).get_layer(layer_index);

        self.draw_banner(&layer, &fonts, &layout.title);
        self.draw_banner(&layer, &fonts, &layout.number);

        for cell in &layout.cells {
            for line in &cell.lines {
                self.draw_line_of_text(&layer, &fonts, &cell.bounds, line);
            }
        }

        layer.set_outline_thickness(self.settings.border_thickness);
        for segment in &layout.grid_lines {
            layer.add_line(self.to_pdf_line(segment));
        }
        drop(layer);

        let bytes = doc.save_to_bytes().map_err(|e| BingoError::RenderError {
            card_number: layout.card_number,
            message: format!("{:?}", e),
        })?;

        tracing::debug!(
            "Rendered card #{} ({} bytes)",
            layout.card_number,
            bytes.len()
        );

        Ok(RenderedCard {
            card_number: layout.card_number,
            file_name: card_file_name(layout.card_number),
            bytes,
        })
    }

    /// Adds every font style the layout uses to the document.
    fn register_fonts(
        &self,
        doc: &PdfDocumentReference,
        layout: &CardLayout,
    ) -> Result<HashMap<FontStyle, IndirectFontRef>> {
        let styles: HashSet<FontStyle> = std::iter::once(&layout.title.line)
            .chain(std::iter::once(&layout.number.line))
            .chain(layout.cells.iter().flat_map(|cell| cell.lines.iter()))
            .map(|line| line.style)
            .collect();

        let mut fonts = HashMap::new();
        for style in FontStyle::ALL {
            if !styles.contains(&style) {
                continue;
            }

            let font = match self.fonts.resolve(style)? {
                FontSource::Builtin(builtin) => doc.add_builtin_font(builtin),
                FontSource::Embedded { data, .. } => {
                    doc.add_external_font(Cursor::new(data.as_slice()))
                }
            }
            .map_err(|e| BingoError::FontError {
                name: style.variant_name().to_string(),
                message: format!("{:?}", e),
            })?;

            fonts.insert(style, font);
        }
        Ok(fonts)
    }

    fn draw_banner(
        &self,
        layer: &PdfLayerReference,
        fonts: &HashMap<FontStyle, IndirectFontRef>,
        banner: &Banner,
    ) {
        self.draw_line_of_text(layer, fonts, &banner.bounds, &banner.line);
    }

    /// Centres `line` horizontally in `bounds`; its vertical centre sits
    /// `line.offset` above the box midline.
    fn draw_line_of_text(
        &self,
        layer: &PdfLayerReference,
        fonts: &HashMap<FontStyle, IndirectFontRef>,
        bounds: &Rect,
        line: &PlacedLine,
    ) {
        let Some(font) = fonts.get(&line.style) else {
            tracing::warn!("No font registered for {:?}, skipping {:?}", line.style, line.text);
            return;
        };

        let (x, y) = self.text_origin(bounds, line);
        layer.use_text(
            line.text.clone(),
            line.font_size,
            Mm(pt_to_mm(x)),
            Mm(pt_to_mm(y)),
            font,
        );
    }

    /// Baseline start of `line` in PDF page coordinates (points, origin
    /// bottom-left).
    pub fn text_origin(&self, bounds: &Rect, line: &PlacedLine) -> (f32, f32) {
        let width = self.fonts.text_width(line.style, &line.text, line.font_size);
        let cap_height = self.fonts.cap_height(line.style);
        let center_y = bounds.center_y() - line.offset;
        let baseline = center_y + cap_height * line.font_size / 2.0;

        self.to_page(bounds.center_x() - width / 2.0, baseline)
    }

    /// Printable-area coordinates (y down) to page coordinates (y up).
    fn to_page(&self, x: f32, y: f32) -> (f32, f32) {
        let page = self.settings.page;
        (page.margin + x, page.height - page.margin - y)
    }

    fn to_pdf_line(&self, segment: &LineSegment) -> Line {
        let (x1, y1) = self.to_page(segment.x1, segment.y1);
        let (x2, y2) = self.to_page(segment.x2, segment.y2);
        Line {
            points: vec![
                (Point::new(Mm(pt_to_mm(x1)), Mm(pt_to_mm(y1))), false),
                (Point::new(Mm(pt_to_mm(x2)), Mm(pt_to_mm(y2))), false),
            ],
            is_closed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fonts::tests::{sample_font_dir, sample_ttf};
    use crate::core::fonts::{BuiltinFontResolver, DirectoryFontResolver, TrueTypeFont, HELVETICA};
    use crate::core::layout::GridLayoutEngine;
    use crate::domain::model::{BingoCard, WordEntry};

    fn layout() -> CardLayout {
        let card = BingoCard {
            number: 3,
            title: "Hemit Musikkbingo".to_string(),
            entries: (0..24)
                .map(|i| WordEntry::new(format!("Artist {}", i), format!("Song {}", i)))
                .collect(),
        };
        GridLayoutEngine::default().layout(&card).unwrap()
    }

    fn renderer() -> DocumentRenderer<BuiltinFontResolver> {
        DocumentRenderer::new(BuiltinFontResolver, LayoutSettings::default())
    }

    #[test]
    fn test_render_produces_pdf() {
        let rendered = renderer().render(&layout()).unwrap();
        assert_eq!(rendered.card_number, 3);
        assert_eq!(rendered.file_name, "bingo_3.pdf");
        assert!(rendered.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_text_origin_is_centered() {
        let renderer = renderer();
        let page = LayoutSettings::default().page;
        let bounds = Rect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 40.0,
        };
        let line = PlacedLine {
            text: "Hi".to_string(),
            style: FontStyle::Regular,
            font_size: 10.0,
            offset: 0.0,
        };

        let (x, y) = renderer.text_origin(&bounds, &line);
        let width = HELVETICA.text_width("Hi", 10.0);
        assert!((x - (page.margin + 50.0 - width / 2.0)).abs() < 1e-3);

        let baseline_down = 20.0 + HELVETICA.cap_height * 5.0;
        assert!((y - (page.height - page.margin - baseline_down)).abs() < 1e-3);
    }

    #[test]
    fn test_embedded_font_text_is_centered() {
        let dir = sample_font_dir("Roboto");
        let fonts = DirectoryFontResolver::load(dir.path(), "Roboto").unwrap();
        let renderer = DocumentRenderer::new(fonts, LayoutSettings::default());
        let page = LayoutSettings::default().page;

        let layout = layout();
        let banner = &layout.title;
        let (x, _) = renderer.text_origin(&banner.bounds, &banner.line);

        let width = TrueTypeFont::parse("sample", sample_ttf())
            .unwrap()
            .text_width(&banner.line.text, banner.line.font_size);
        let left_gap = x - page.margin - banner.bounds.x;
        let right_gap = banner.bounds.width - left_gap - width;
        assert!((left_gap - right_gap).abs() < 1e-2);
    }

    #[test]
    fn test_render_with_embedded_font() {
        let dir = sample_font_dir("Roboto");
        let fonts = DirectoryFontResolver::load(dir.path(), "Roboto").unwrap();
        let renderer = DocumentRenderer::new(fonts, LayoutSettings::default());

        let rendered = renderer.render(&layout()).unwrap();
        assert!(rendered.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_positive_offset_moves_text_up() {
        let renderer = renderer();
        let bounds = Rect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 40.0,
        };
        let mut line = PlacedLine {
            text: "Song".to_string(),
            style: FontStyle::Italic,
            font_size: 8.0,
            offset: 0.0,
        };
        let (_, centered) = renderer.text_origin(&bounds, &line);
        line.offset = 4.0;
        let (_, raised) = renderer.text_origin(&bounds, &line);
        assert!((raised - centered - 4.0).abs() < 1e-3);
    }
}
