//! Per-donor aggregation of a church's incoming transactions.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use ecclesia_shared::types::{ChurchId, ContributionId, MemberId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FiscalError;

/// Direction of a church transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionKind {
    /// Money received (tithes, offerings, donations).
    Income,
    /// Money spent.
    Expense,
}

impl ContributionKind {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for ContributionKind {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(FiscalError::UnknownKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for ContributionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dated monetary transaction of a church.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRecord {
    /// Transaction ID.
    pub id: ContributionId,
    /// Church that owns the transaction.
    pub church_id: ChurchId,
    /// Member the money came from, if attributed.
    pub donor_id: Option<MemberId>,
    /// Income or expense.
    pub kind: ContributionKind,
    /// Amount with two decimal places.
    pub amount: Decimal,
    /// When the transaction happened.
    pub occurred_at: DateTime<Utc>,
    /// Storage key of the generated receipt, once issued.
    pub receipt_key: Option<String>,
}

/// Identity fields of a donor as printed on fiscal documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    /// Member ID.
    pub id: MemberId,
    /// Name shown on documents.
    pub display_name: String,
    /// Taxpayer identifier as entered, unvalidated.
    pub tax_identifier: Option<String>,
    /// Postal address.
    pub postal_address: Option<String>,
}

/// Yearly total of one donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorTotal {
    /// The donor.
    pub donor: Donor,
    /// Sum of the donor's incoming transactions in the year.
    pub total_amount: Decimal,
    /// Number of transactions summed.
    pub record_count: u32,
}

/// A calendar year a declaration is filed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiscalYear(i32);

impl FiscalYear {
    /// Earliest year accepted.
    pub const MIN: i32 = 1900;
    /// Latest year accepted.
    pub const MAX: i32 = 9998;

    /// Creates a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `FiscalError::InvalidYear` outside `MIN..=MAX`.
    pub fn new(year: i32) -> Result<Self, FiscalError> {
        if (Self::MIN..=Self::MAX).contains(&year) {
            Ok(Self(year))
        } else {
            Err(FiscalError::InvalidYear {
                year,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// The calendar year.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Half-open UTC window `[Jan 1 00:00, Jan 1 of next year 00:00)`.
    ///
    /// Covers every instant of Dec 31, sub-second timestamps included.
    #[must_use]
    pub fn window(self) -> (DateTime<Utc>, DateTime<Utc>) {
        (start_of_year(self.0), start_of_year(self.0 + 1))
    }

    /// Whether `instant` falls inside this year.
    #[must_use]
    pub fn contains(self, instant: DateTime<Utc>) -> bool {
        instant.year() == self.0
    }
}

impl std::fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn start_of_year(year: i32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map_or(DateTime::<Utc>::MAX_UTC, |naive| naive.and_utc())
}

/// Groups transactions into per-donor yearly totals.
pub struct DonorAggregator;

impl DonorAggregator {
    /// Aggregates the incoming transactions of `church_id` in `year` per donor.
    ///
    /// Records of other churches, other years, expenses and anonymous
    /// transactions are ignored, as are records whose donor is missing from
    /// `donors`. The result is ordered by display name ignoring case and
    /// accents, then by the raw name, then donor id.
    #[must_use]
    pub fn aggregate(
        church_id: ChurchId,
        year: FiscalYear,
        records: &[ContributionRecord],
        donors: &[Donor],
    ) -> Vec<DonorTotal> {
        let directory: HashMap<MemberId, &Donor> = donors.iter().map(|d| (d.id, d)).collect();
        let mut totals: HashMap<MemberId, (Decimal, u32)> = HashMap::new();

        for record in records {
            if record.church_id != church_id
                || record.kind != ContributionKind::Income
                || !year.contains(record.occurred_at)
            {
                continue;
            }
            let Some(donor_id) = record.donor_id else {
                continue;
            };
            if !directory.contains_key(&donor_id) {
                continue;
            }

            let entry = totals.entry(donor_id).or_insert((Decimal::ZERO, 0));
            entry.0 += record.amount;
            entry.1 += 1;
        }

        let mut result: Vec<DonorTotal> = totals
            .into_iter()
            .filter_map(|(donor_id, (total_amount, record_count))| {
                directory.get(&donor_id).map(|donor| DonorTotal {
                    donor: (*donor).clone(),
                    total_amount,
                    record_count,
                })
            })
            .collect();

        result.sort_by_cached_key(|total| {
            (
                name_sort_key(&total.donor.display_name),
                total.donor.display_name.clone(),
                total.donor.id.into_inner(),
            )
        });

        result
    }
}

/// Lowercases `name` and strips the diacritics common in Portuguese and
/// Spanish names so "Álvaro" sorts next to "alvaro".
fn name_sort_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
