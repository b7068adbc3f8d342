//! Spreadsheet rendition of the declaration.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};

use super::error::DocumentError;
use super::form::DeclarationForm;
use super::format::spreadsheet_filename;
use super::{RenderedDocument, XLSX_CONTENT_TYPE};

/// Column titles of the sheet.
pub const HEADER: [&str; 3] = ["NIF Doador", "Código", "Valor Total (€)"];

/// Label of the grand-total row.
pub const TOTAL_LABEL: &str = "SOMA";

/// Writes the declaration as an xlsx workbook.
pub struct SpreadsheetFiller;

impl SpreadsheetFiller {
    /// Renders `form` to a workbook with a header, one row per donor and a total row.
    ///
    /// # Errors
    ///
    /// Returns an error if the workbook cannot be written.
    pub fn render(form: &DeclarationForm) -> Result<RenderedDocument, DocumentError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let money = Format::new().set_num_format("0.00");
        let money_bold = Format::new().set_bold().set_num_format("0.00");
        let text = Format::new().set_num_format("@");

        let sheet = workbook.add_worksheet();
        sheet.set_name(format!("Modelo 25 {}", form.year))?;
        sheet.set_column_width(0, 18)?;
        sheet.set_column_width(1, 10)?;
        sheet.set_column_width(2, 18)?;

        for (col, title) in (0u16..).zip(HEADER) {
            sheet.write_string_with_format(0, col, title, &bold)?;
        }

        let mut row: u32 = 1;
        for entry in &form.rows {
            sheet.write_string_with_format(row, 0, &entry.tax_id, &text)?;
            sheet.write_string_with_format(row, 1, &entry.operation_code, &text)?;
            sheet.write_number_with_format(row, 2, entry.amount.to_f64().unwrap_or_default(), &money)?;
            row += 1;
        }

        sheet.write_string_with_format(row, 0, TOTAL_LABEL, &bold)?;
        sheet.write_number_with_format(row, 2, form.total.to_f64().unwrap_or_default(), &money_bold)?;

        let bytes = workbook.save_to_buffer()?;

        Ok(RenderedDocument {
            filename: spreadsheet_filename(form.declarant_nif.as_deref(), form.year),
            content_type: XLSX_CONTENT_TYPE,
            bytes,
        })
    }
}
