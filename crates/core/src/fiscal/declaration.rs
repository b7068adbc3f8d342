//! Declarable / excluded split of a year's donor totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregation::DonorTotal;
use super::tax_id::{TaxCountry, validate_optional_tax_id};

/// Summary figures of a declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationStats {
    /// Donors with a valid identifier.
    pub total_donors: usize,
    /// Grand total of the declarable donors.
    pub total_amount: Decimal,
    /// Number of transactions behind `total_amount`.
    pub total_donations: u32,
    /// Donors left out for a missing or invalid identifier.
    pub excluded_donors: usize,
    /// Amount donated by the excluded donors.
    pub excluded_amount: Decimal,
}

/// Annual donations declaration of one church.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Donors that go on the official form.
    pub valid: Vec<DonorTotal>,
    /// Donors kept out of the form, listed for follow-up.
    pub excluded: Vec<DonorTotal>,
    /// Summary figures.
    pub stats: DeclarationStats,
}

impl Declaration {
    /// Splits aggregated totals on the validity of each donor's identifier.
    ///
    /// Input order is preserved within both sets.
    #[must_use]
    pub fn partition(totals: Vec<DonorTotal>, country: TaxCountry) -> Self {
        let (valid, excluded): (Vec<_>, Vec<_>) = totals.into_iter().partition(|total| {
            validate_optional_tax_id(total.donor.tax_identifier.as_deref(), country)
        });

        let stats = DeclarationStats {
            total_donors: valid.len(),
            total_amount: valid.iter().map(|t| t.total_amount).sum(),
            total_donations: valid.iter().map(|t| t.record_count).sum(),
            excluded_donors: excluded.len(),
            excluded_amount: excluded.iter().map(|t| t.total_amount).sum(),
        };

        Self {
            valid,
            excluded,
            stats,
        }
    }

    /// Grand total printed on the summary row.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.stats.total_amount
    }

    /// Whether nobody can be declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }
}
