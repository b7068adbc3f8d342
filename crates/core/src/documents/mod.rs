//! Fiscal document generation.
//!
//! Every filler renders fully in memory and returns a [`RenderedDocument`];
//! persisting it is the job of [`crate::storage::DocumentStore`].
//!
//! | Filler                | Output                                      |
//! |-----------------------|---------------------------------------------|
//! | `SpreadsheetFiller`   | xlsx with one row per donor and a total row |
//! | `TemplateOverlay`     | the official form PDF with text drawn on it |
//! | `OfficialReport`      | A4 PDF drawn in the layout of the form      |
//! | `DonorReceipt`        | yearly receipt for one donor                |
//! | `ContributionReceipt` | receipt for one transaction                 |

mod canvas;
mod error;
mod form;
mod format;
mod overlay;
mod receipt;
mod report;
mod spreadsheet;

pub use error::DocumentError;
pub use form::{DEFAULT_OPERATION_CODE, DeclarationForm, FormRow};
pub use format::{MISSING_NIF, format_amount, format_amount_grouped};
pub use overlay::{FormTemplate, OverlayLayout, TemplateOverlay};
pub use receipt::{ANONYMOUS_DONOR, ContributionDetails, ContributionReceipt, DonorReceipt, Issuer};
pub use report::OfficialReport;
pub use spreadsheet::SpreadsheetFiller;

/// MIME type of generated PDFs.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// MIME type of generated workbooks.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A generated file ready to store or download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Deterministic download name.
    pub filename: String,
    /// MIME type.
    pub content_type: &'static str,
    /// File contents.
    pub bytes: Vec<u8>,
}
