//! Text formatting shared by the document fillers.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::fiscal::FiscalYear;

/// Placeholder used in filenames when the church has no fiscal identifier.
pub const MISSING_NIF: &str = "sem_nif";

/// Formats an amount with two decimals, e.g. `1500.00`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Formats an amount with two decimals and comma-grouped thousands, e.g. `1,500.00`.
#[must_use]
pub fn format_amount_grouped(amount: Decimal) -> String {
    let plain = format_amount(amount);
    let (sign, unsigned) = plain
        .strip_prefix('-')
        .map_or(("", plain.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}

/// Formats a date as `dd/mm/yyyy`.
#[must_use]
pub fn format_date(instant: DateTime<Utc>) -> String {
    instant.format("%d/%m/%Y").to_string()
}

/// Keeps only characters that are safe in a download filename.
#[must_use]
pub fn filename_component(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

fn declarant_component(declarant_nif: Option<&str>) -> String {
    declarant_nif
        .map(filename_component)
        .filter(|nif| !nif.is_empty())
        .unwrap_or_else(|| MISSING_NIF.to_string())
}

/// `Modelo25_{nif}_{year}.xlsx`
#[must_use]
pub fn spreadsheet_filename(declarant_nif: Option<&str>, year: FiscalYear) -> String {
    format!("Modelo25_{}_{year}.xlsx", declarant_component(declarant_nif))
}

/// `Modelo25_{nif}_{year}.pdf`
#[must_use]
pub fn form_filename(declarant_nif: Option<&str>, year: FiscalYear) -> String {
    format!("Modelo25_{}_{year}.pdf", declarant_component(declarant_nif))
}

/// `Modelo25_Oficial_{year}.pdf`
#[must_use]
pub fn official_report_filename(year: FiscalYear) -> String {
    format!("Modelo25_Oficial_{year}.pdf")
}

/// `Comprovativo_{tax id or member id}_{year}.pdf`
#[must_use]
pub fn donor_receipt_filename(donor_key: &str, year: FiscalYear) -> String {
    format!("Comprovativo_{}_{year}.pdf", filename_component(donor_key))
}

/// `recibo_{id}_{YYYYMMDD}.pdf`
#[must_use]
pub fn contribution_receipt_filename(contribution_id: &str, occurred_at: DateTime<Utc>) -> String {
    format!(
        "recibo_{}_{}.pdf",
        filename_component(contribution_id),
        occurred_at.format("%Y%m%d")
    )
}

/// Encodes text for the standard PDF fonts (WinAnsiEncoding).
///
/// Latin-1 maps one to one, the euro sign has its own slot and anything else
/// becomes `?`.
#[must_use]
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '€' => 0x80,
            ch if u32::from(ch) < 0x80 || (0xA0..=0xFF).contains(&u32::from(ch)) => {
                u8::try_from(u32::from(ch)).unwrap_or(b'?')
            }
            _ => b'?',
        })
        .collect()
}
