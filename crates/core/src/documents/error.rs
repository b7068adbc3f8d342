//! Document generation error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while filling or rendering a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The official form template is not where the configuration says.
    #[error("form template not found at {}", path.display())]
    TemplateMissing {
        /// Configured template path.
        path: PathBuf,
    },

    /// More rows than the template page can hold.
    #[error("{rows} rows do not fit on the form template (at most {capacity})")]
    TemplateOverflow {
        /// Rows requested.
        rows: usize,
        /// Rows the layout can print.
        capacity: usize,
    },

    /// The template is a PDF without pages.
    #[error("form template has no pages")]
    TemplateEmpty,

    /// PDF encoding or parsing failure.
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Spreadsheet encoding failure.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// Reading the template failed for a reason other than absence.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentError {
    /// Whether the requester can act on the error (as opposed to a server fault).
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::TemplateMissing { .. } | Self::TemplateOverflow { .. } | Self::TemplateEmpty
        )
    }
}
