//! Self-drawn rendition of the declaration in the layout of the official form.

use super::canvas::{A4_HEIGHT, A4_WIDTH, Font, PdfCanvas, mm};
use super::error::DocumentError;
use super::form::DeclarationForm;
use super::format::{format_amount, official_report_filename};
use super::{PDF_CONTENT_TYPE, RenderedDocument};

const LEFT: i64 = mm(20);
const TABLE_WIDTH: i64 = mm(170);
const ROW_HEIGHT: i64 = mm(6);
const TOTAL_HEIGHT: i64 = mm(8);
const AMOUNT_RIGHT: i64 = mm(185);
const BOTTOM_LIMIT: i64 = A4_HEIGHT - mm(40);

/// Draws the declaration as a standalone A4 document, page breaks included.
pub struct OfficialReport;

impl OfficialReport {
    /// Renders `form`.
    ///
    /// # Errors
    ///
    /// Returns an error if the PDF cannot be encoded.
    pub fn render(form: &DeclarationForm) -> Result<RenderedDocument, DocumentError> {
        let mut canvas = PdfCanvas::new();
        let mut y = draw_page_header(&mut canvas, form);

        canvas.text(
            Font::Bold,
            9,
            LEFT,
            y,
            "5 - RELAÇÃO DAS ENTIDADES DOADORAS E DOS DONATIVOS",
        );
        y += mm(5);
        y = draw_table_header(&mut canvas, y);

        for row in &form.rows {
            if y + ROW_HEIGHT > BOTTOM_LIMIT {
                canvas.new_page();
                y = draw_page_header(&mut canvas, form);
                y = draw_table_header(&mut canvas, y);
            }

            canvas.rect(LEFT, y, TABLE_WIDTH, ROW_HEIGHT);
            let baseline = y + mm(4);
            canvas.text(Font::Regular, 9, mm(25), baseline, &row.tax_id);
            canvas.text(Font::Regular, 9, mm(85), baseline, &row.operation_code);
            canvas.text_right(Font::Regular, 9, AMOUNT_RIGHT, baseline, &format_amount(row.amount));
            y += ROW_HEIGHT;
        }

        if y + TOTAL_HEIGHT > BOTTOM_LIMIT {
            canvas.new_page();
            y = draw_page_header(&mut canvas, form);
        }

        canvas.rect(LEFT, y, TABLE_WIDTH, TOTAL_HEIGHT);
        canvas.text(Font::Bold, 10, mm(25), y + mm(5), "SOMA");
        canvas.text_right(Font::Bold, 10, AMOUNT_RIGHT, y + mm(5), &format_amount(form.total));

        Ok(RenderedDocument {
            filename: official_report_filename(form.year),
            content_type: PDF_CONTENT_TYPE,
            bytes: canvas.finish()?,
        })
    }
}

/// Titles and identification boxes. Returns where the body starts.
fn draw_page_header(canvas: &mut PdfCanvas, form: &DeclarationForm) -> i64 {
    canvas.text(Font::Bold, 10, LEFT, mm(15), "MINISTÉRIO DAS FINANÇAS");
    canvas.text(Font::Regular, 8, LEFT, mm(19), "AUTORIDADE TRIBUTÁRIA E ADUANEIRA");
    canvas.text_centered(Font::Bold, 14, A4_WIDTH / 2, mm(25), "DONATIVOS RECEBIDOS");
    canvas.text(Font::Bold, 12, A4_WIDTH - mm(50), mm(15), "IRS - IRC");
    canvas.text(Font::Bold, 16, A4_WIDTH - mm(50), mm(25), "MODELO 25");

    let top = mm(30);
    let label_height = mm(10);
    let value_height = mm(6);

    labelled_box(canvas, mm(20), top, mm(60), label_height, "1 - NIF DO DECLARANTE");
    value_box(canvas, mm(20), top + label_height, mm(60), value_height, form.declarant_label());

    labelled_box(canvas, mm(85), top, mm(30), label_height, "2 - ANO");
    value_box(canvas, mm(85), top + label_height, mm(30), value_height, &form.year.to_string());

    labelled_box(canvas, mm(120), top, mm(70), label_height, "4 - TIPO DE DECLARAÇÃO");
    canvas.text(Font::Regular, 8, mm(125), top + label_height + mm(4), "[X] Primeira");
    canvas.text(Font::Regular, 8, mm(155), top + label_height + mm(4), "[ ] Substituição");

    top + label_height + mm(20)
}

fn draw_table_header(canvas: &mut PdfCanvas, y: i64) -> i64 {
    canvas.rect(LEFT, y, TABLE_WIDTH, ROW_HEIGHT);
    let baseline = y + mm(4);
    canvas.text(Font::Bold, 9, mm(25), baseline, "NIF DOADOR");
    canvas.text(Font::Bold, 9, mm(80), baseline, "CÓDIGO");
    canvas.text(Font::Bold, 9, mm(140), baseline, "VALOR DO DONATIVO");
    y + ROW_HEIGHT
}

fn labelled_box(canvas: &mut PdfCanvas, x: i64, y: i64, width: i64, height: i64, label: &str) {
    canvas.rect(x, y, width, height);
    canvas.text(Font::Bold, 8, x + 5, y + height / 2 + 2, label);
}

fn value_box(canvas: &mut PdfCanvas, x: i64, y: i64, width: i64, height: i64, value: &str) {
    canvas.rect(x, y, width, height);
    canvas.text_centered(Font::Regular, 8, x + width / 2, y + height / 2 + 2, value);
}
