//! Taxpayer identifier validation.
//!
//! A donor may only be declared when their identifier passes the checksum of
//! the declaring church's country. Validation never fails loudly: malformed
//! input is simply not a valid identifier.

use serde::{Deserialize, Serialize};

/// Length of a Portuguese NIF.
pub const NIF_LENGTH: usize = 9;

/// Jurisdiction whose identifier rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxCountry {
    /// Portugal: 9-digit NIF with a mod-11 check digit.
    Portugal,
    /// Any other country. Only requires some digits.
    Other,
}

impl TaxCountry {
    /// Resolves the rules for the free-text country stored on a church.
    ///
    /// A church without a country is held to the Portuguese rules, the
    /// jurisdiction of the annual donations form.
    #[must_use]
    pub fn from_church_country(country: Option<&str>) -> Self {
        match country.map(str::trim) {
            None | Some("") => Self::Portugal,
            Some(name) if name.eq_ignore_ascii_case("portugal") => Self::Portugal,
            Some(_) => Self::Other,
        }
    }
}

/// Strips everything that is not an ASCII digit.
#[must_use]
pub fn normalize_tax_id(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Computes the Portuguese check digit for the first eight digits of a NIF.
///
/// Digit `i` (0-indexed) is weighted `9 - i`; a remainder of 0 or 1 yields 0,
/// anything else `11 - remainder`.
#[must_use]
pub fn portuguese_check_digit(body: &[u8; 8]) -> u8 {
    let sum: u32 = body
        .iter()
        .zip((2..=9u32).rev())
        .map(|(digit, weight)| u32::from(*digit) * weight)
        .sum();

    match sum % 11 {
        0 | 1 => 0,
        // remainder is 2..=10, so the result is 1..=9
        rem => u8::try_from(11 - rem).unwrap_or(0),
    }
}

/// Returns whether `raw` is an acceptable taxpayer identifier for `country`.
#[must_use]
pub fn validate_tax_id(raw: &str, country: TaxCountry) -> bool {
    let digits = normalize_tax_id(raw);

    match country {
        TaxCountry::Portugal => is_valid_nif(&digits),
        // Placeholder rule: no checksum is known for other jurisdictions.
        TaxCountry::Other => !digits.is_empty(),
    }
}

/// Validates an optional identifier, treating a missing one as invalid.
#[must_use]
pub fn validate_optional_tax_id(raw: Option<&str>, country: TaxCountry) -> bool {
    raw.is_some_and(|id| validate_tax_id(id, country))
}

fn is_valid_nif(digits: &str) -> bool {
    if digits.len() != NIF_LENGTH {
        return false;
    }

    let values: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();

    // An all-zero number is the blank-form placeholder, never an issued identifier.
    if values.iter().all(|d| *d == 0) {
        return false;
    }

    let mut body = [0u8; 8];
    body.copy_from_slice(&values[..8]);

    values[8] == portuguese_check_digit(&body)
}
