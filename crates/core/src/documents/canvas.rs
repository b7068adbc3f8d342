//! Minimal drawing surface over `lopdf` for the generated documents.
//!
//! Coordinates are integer points with the origin at the top-left corner of
//! an A4 page, the way the paper forms are measured. They are flipped to PDF
//! user space when operations are emitted.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use super::error::DocumentError;
use super::format::encode_win_ansi;

/// A4 width in points.
pub const A4_WIDTH: i64 = 595;
/// A4 height in points.
pub const A4_HEIGHT: i64 = 842;

/// Millimetres to points, rounded down.
#[must_use]
pub const fn mm(value: i64) -> i64 {
    value * 2835 / 1000
}

/// Standard fonts available on every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Helvetica.
    Regular,
    /// Helvetica-Bold.
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// Approximate Helvetica advance width of `text` at `size`, in points.
///
/// Digits and punctuation use the real metrics so numeric columns line up;
/// letters use an average.
#[must_use]
pub fn text_width(text: &str, size: i64) -> i64 {
    let units: i64 = text
        .chars()
        .map(|ch| match ch {
            '0'..='9' | '€' => 556,
            '.' | ',' | ' ' | ':' | '/' => 278,
            '-' | '(' | ')' => 333,
            'A'..='Z' => 667,
            'i' | 'j' | 'l' => 222,
            _ => 556,
        })
        .sum();
    units * size / 1000
}

/// Builds a multi-page PDF from drawing calls.
#[derive(Debug, Default)]
pub struct PdfCanvas {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
}

impl PdfCanvas {
    /// Starts a document with one empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the current page and starts a new one.
    pub fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
    }

    /// Draws `text` with its baseline starting at (`x`, `y`).
    pub fn text(&mut self, font: Font, size: i64, x: i64, y: i64, text: &str) {
        self.current.extend(text_operations(font.resource_name(), size, x, A4_HEIGHT - y, text));
    }

    /// Draws `text` centred on `center_x`.
    pub fn text_centered(&mut self, font: Font, size: i64, center_x: i64, y: i64, text: &str) {
        let x = center_x - text_width(text, size) / 2;
        self.text(font, size, x, y, text);
    }

    /// Draws `text` ending at `right_x`.
    pub fn text_right(&mut self, font: Font, size: i64, right_x: i64, y: i64, text: &str) {
        let x = right_x - text_width(text, size);
        self.text(font, size, x, y, text);
    }

    /// Strokes a line.
    pub fn line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        self.current.extend([
            Operation::new("m", vec![x1.into(), (A4_HEIGHT - y1).into()]),
            Operation::new("l", vec![x2.into(), (A4_HEIGHT - y2).into()]),
            Operation::new("S", vec![]),
        ]);
    }

    /// Strokes a rectangle whose top-left corner is (`x`, `y`).
    pub fn rect(&mut self, x: i64, y: i64, width: i64, height: i64) {
        self.current.extend([
            Operation::new(
                "re",
                vec![
                    x.into(),
                    (A4_HEIGHT - y - height).into(),
                    width.into(),
                    height.into(),
                ],
            ),
            Operation::new("S", vec![]),
        ]);
    }

    /// Serializes the document.
    ///
    /// # Errors
    ///
    /// Returns an error if a content stream cannot be encoded.
    pub fn finish(mut self) -> Result<Vec<u8>, DocumentError> {
        self.new_page();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(standard_font("Helvetica"));
        let bold = doc.add_object(standard_font("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations }.encode()?;
            let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0_i64.into(), 0_i64.into(), A4_WIDTH.into(), A4_HEIGHT.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

/// Type1 standard font dictionary with WinAnsi encoding.
pub(crate) fn standard_font(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// `BT /font size Tf x y Td (text) Tj ET` with PDF user-space coordinates.
pub(crate) fn text_operations(
    font_resource: &str,
    size: i64,
    x: i64,
    pdf_y: i64,
    text: &str,
) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font_resource.into(), size.into()]),
        Operation::new("Td", vec![x.into(), pdf_y.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_points() {
        assert_eq!(mm(0), 0);
        assert_eq!(mm(10), 28);
        assert_eq!(mm(20), 56);
        assert_eq!(mm(210), 595);
    }

    #[test]
    fn test_text_width_digits() {
        assert_eq!(text_width("0000", 10), 22);
        assert_eq!(text_width("1.00", 10), 19);
        assert_eq!(text_width("", 12), 0);
    }

    #[test]
    fn test_finish_produces_pdf_with_every_page() {
        let mut canvas = PdfCanvas::new();
        canvas.text(Font::Bold, 14, 50, 50, "DONATIVOS RECEBIDOS");
        canvas.rect(50, 80, 100, 20);
        canvas.new_page();
        canvas.line(50, 100, 200, 100);

        let bytes = canvas.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}
