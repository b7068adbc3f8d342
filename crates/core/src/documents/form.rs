//! Row data of the annual donations declaration.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::fiscal::{Declaration, FiscalYear, normalize_tax_id};

/// Operation code for cash or in-kind donations.
pub const DEFAULT_OPERATION_CODE: &str = "01";

/// One donor line of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormRow {
    /// Donor tax identifier, digits only.
    pub tax_id: String,
    /// Classification code of the donation.
    pub operation_code: String,
    /// Donor's total for the year.
    pub amount: Decimal,
}

/// Everything printed on a declaration, whatever the output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationForm {
    /// Fiscal identifier of the declaring church, digits only.
    pub declarant_nif: Option<String>,
    /// Year declared.
    pub year: FiscalYear,
    /// One row per declarable donor.
    pub rows: Vec<FormRow>,
    /// Sum of all rows.
    pub total: Decimal,
}

impl DeclarationForm {
    /// Builds the form rows from the declarable donors of `declaration`.
    #[must_use]
    pub fn from_declaration(
        declaration: &Declaration,
        declarant_nif: Option<&str>,
        year: FiscalYear,
        operation_code: &str,
    ) -> Self {
        let rows: Vec<FormRow> = declaration
            .valid
            .iter()
            .map(|total| FormRow {
                tax_id: total
                    .donor
                    .tax_identifier
                    .as_deref()
                    .map(normalize_tax_id)
                    .unwrap_or_default(),
                operation_code: operation_code.to_string(),
                amount: total.total_amount,
            })
            .collect();

        let total = rows.iter().map(|row| row.amount).sum();

        Self {
            declarant_nif: declarant_nif
                .map(normalize_tax_id)
                .filter(|nif| !nif.is_empty()),
            year,
            rows,
            total,
        }
    }

    /// Declarant identifier as printed, empty when unknown.
    #[must_use]
    pub fn declarant_label(&self) -> &str {
        self.declarant_nif.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiscal::{Donor, DonorTotal, TaxCountry};
    use ecclesia_shared::types::MemberId;
    use rust_decimal_macros::dec;

    fn total(name: &str, tax_id: &str, amount: Decimal) -> DonorTotal {
        DonorTotal {
            donor: Donor {
                id: MemberId::new(),
                display_name: name.to_string(),
                tax_identifier: Some(tax_id.to_string()),
                postal_address: None,
            },
            total_amount: amount,
            record_count: 1,
        }
    }

    #[test]
    fn test_form_uses_only_valid_donors() {
        let declaration = Declaration::partition(
            vec![
                total("Ana", "123 456 789", dec!(125.25)),
                total("Bruno", "000000000", dec!(10.00)),
            ],
            TaxCountry::Portugal,
        );

        let form = DeclarationForm::from_declaration(
            &declaration,
            Some("PT501964843"),
            FiscalYear::new(2025).unwrap(),
            DEFAULT_OPERATION_CODE,
        );

        assert_eq!(form.declarant_nif.as_deref(), Some("501964843"));
        assert_eq!(
            form.rows,
            vec![FormRow {
                tax_id: "123456789".to_string(),
                operation_code: "01".to_string(),
                amount: dec!(125.25),
            }]
        );
        assert_eq!(form.total, dec!(125.25));
    }

    #[test]
    fn test_blank_declarant_is_none() {
        let form = DeclarationForm::from_declaration(
            &Declaration::default(),
            Some(" - "),
            FiscalYear::new(2024).unwrap(),
            DEFAULT_OPERATION_CODE,
        );

        assert_eq!(form.declarant_nif, None);
        assert_eq!(form.declarant_label(), "");
        assert!(form.rows.is_empty());
        assert_eq!(form.total, Decimal::ZERO);
    }
}
