//! Donor annual receipts and single-contribution receipts.

use chrono::{DateTime, Utc};
use ecclesia_shared::types::{ContributionId, Money};

use super::canvas::{A4_HEIGHT, A4_WIDTH, Font, PdfCanvas, mm};
use super::error::DocumentError;
use super::format::{
    contribution_receipt_filename, donor_receipt_filename, format_amount, format_date,
};
use super::{PDF_CONTENT_TYPE, RenderedDocument};
use crate::fiscal::{DonorTotal, FiscalYear, normalize_tax_id};

/// Name shown when a contribution has no donor.
pub const ANONYMOUS_DONOR: &str = "Doador Anônimo";

/// The church as printed on receipts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuer {
    /// Church name.
    pub name: String,
    /// Church fiscal identifier.
    pub nif: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// "Comprovativo de donativo": what one donor gave in a year.
pub struct DonorReceipt;

impl DonorReceipt {
    /// Renders the receipt for `donor` in `year`.
    ///
    /// # Errors
    ///
    /// Returns an error if the PDF cannot be encoded.
    pub fn render(
        issuer: &Issuer,
        donor: &DonorTotal,
        year: FiscalYear,
    ) -> Result<RenderedDocument, DocumentError> {
        let donor_nif = donor
            .donor
            .tax_identifier
            .as_deref()
            .map(normalize_tax_id)
            .filter(|nif| !nif.is_empty());

        let mut canvas = PdfCanvas::new();
        canvas.text_centered(Font::Bold, 16, A4_WIDTH / 2, mm(30), "COMPROVATIVO DE DONATIVO");
        canvas.text(
            Font::Regular,
            10,
            mm(20),
            mm(50),
            &format!(
                "Entidade: {} (NIF: {})",
                issuer.name,
                issuer.nif.as_deref().unwrap_or("-")
            ),
        );
        canvas.text(
            Font::Regular,
            10,
            mm(20),
            mm(60),
            &format!(
                "Doador: {} (NIF: {})",
                donor.donor.display_name,
                donor_nif.as_deref().unwrap_or("-")
            ),
        );
        canvas.text(
            Font::Bold,
            12,
            mm(20),
            mm(80),
            &format!(
                "VALOR TOTAL EM {year}: € {}",
                format_amount(donor.total_amount)
            ),
        );
        canvas.text(
            Font::Regular,
            9,
            mm(20),
            mm(88),
            &format!("Número de donativos: {}", donor.record_count),
        );

        let donor_key = donor_nif.unwrap_or_else(|| donor.donor.id.to_string());

        Ok(RenderedDocument {
            filename: donor_receipt_filename(&donor_key, year),
            content_type: PDF_CONTENT_TYPE,
            bytes: canvas.finish()?,
        })
    }
}

/// One recorded contribution, as printed on its receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionDetails {
    /// Contribution ID.
    pub id: ContributionId,
    /// Donor name, `None` for anonymous gifts.
    pub donor_name: Option<String>,
    /// Amount in the church's currency.
    pub amount: Money,
    /// Category, e.g. "tithe" or "offering".
    pub category: String,
    /// When the money was received.
    pub occurred_at: DateTime<Utc>,
}

/// "Recibo de contribuição" for a single transaction.
pub struct ContributionReceipt;

impl ContributionReceipt {
    /// Renders the receipt of `contribution`.
    ///
    /// # Errors
    ///
    /// Returns an error if the PDF cannot be encoded.
    pub fn render(
        issuer: &Issuer,
        contribution: &ContributionDetails,
    ) -> Result<RenderedDocument, DocumentError> {
        let mut canvas = PdfCanvas::new();
        let left = mm(10);

        canvas.text_centered(Font::Bold, 15, A4_WIDTH / 2, mm(20), "RECIBO DE CONTRIBUIÇÃO");

        canvas.text(Font::Bold, 12, left, mm(35), &format!("Igreja: {}", issuer.name));
        canvas.text(
            Font::Regular,
            12,
            left,
            mm(45),
            &format!(
                "Endereço: {}",
                issuer.address.as_deref().unwrap_or("Endereço Não Disponível")
            ),
        );

        let lines = [
            format!(
                "Recebemos de: {}",
                contribution.donor_name.as_deref().unwrap_or(ANONYMOUS_DONOR)
            ),
            format!(
                "A quantia de: {} {}",
                contribution.amount.currency.symbol(),
                format_amount(contribution.amount.amount)
            ),
            format!("Referente a: {}", capitalize(&contribution.category)),
            format!("Data: {}", format_date(contribution.occurred_at)),
        ];
        let mut y = mm(65);
        for line in &lines {
            canvas.text(Font::Regular, 12, left, y, line);
            y += mm(10);
        }

        y += mm(20);
        canvas.line(left, y, mm(100), y);
        canvas.text(Font::Regular, 12, left, y + mm(7), "Assinatura da Tesouraria");

        canvas.text_centered(Font::Regular, 8, A4_WIDTH / 2, A4_HEIGHT - mm(10), "Página 1");

        Ok(RenderedDocument {
            filename: contribution_receipt_filename(
                &contribution.id.to_string(),
                contribution.occurred_at,
            ),
            content_type: PDF_CONTENT_TYPE,
            bytes: canvas.finish()?,
        })
    }
}

fn capitalize(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
