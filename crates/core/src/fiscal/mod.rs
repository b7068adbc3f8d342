//! Fiscal donation reporting.
//!
//! The annual donations declaration is produced in three steps:
//! - `aggregation` - sum a church's incoming transactions per donor and year
//! - `tax_id` - check each donor's taxpayer identifier
//! - `declaration` - split donors into declarable and excluded sets

pub mod aggregation;
pub mod declaration;
pub mod error;
pub mod tax_id;


pub use aggregation::{
    ContributionKind, ContributionRecord, Donor, DonorAggregator, DonorTotal, FiscalYear,
};
pub use declaration::{Declaration, DeclarationStats};
pub use error::FiscalError;
pub use tax_id::{TaxCountry, normalize_tax_id, validate_optional_tax_id, validate_tax_id};
