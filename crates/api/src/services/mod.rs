//! Composition of repositories, fillers and storage behind the routes.

pub mod fiscal;
pub mod receipts;

pub use fiscal::{ChurchDeclaration, FiscalReportService};
pub use receipts::issue_contribution_receipt;
