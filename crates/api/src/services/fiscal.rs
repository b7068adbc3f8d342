//! Annual declaration and donor receipt assembly.

use std::sync::Arc;

use ecclesia_core::documents::{
    DeclarationForm, DonorReceipt, FormTemplate, Issuer, OfficialReport, RenderedDocument,
    SpreadsheetFiller, TemplateOverlay,
};
use ecclesia_core::fiscal::{Declaration, DonorAggregator, DonorTotal, FiscalYear, TaxCountry};
use ecclesia_db::{ChurchRepository, ContributionRepository, MemberRepository, entities::churches};
use ecclesia_shared::DocumentsConfig;
use ecclesia_shared::types::{ChurchId, MemberId};
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::ApiError;

/// A church's declaration together with the church it was built for.
#[derive(Debug, Clone)]
pub struct ChurchDeclaration {
    /// The declaring church, `None` when the id matches no church.
    pub church: Option<churches::Model>,
    /// Year declared.
    pub year: FiscalYear,
    /// Valid and excluded donors.
    pub declaration: Declaration,
}

impl ChurchDeclaration {
    /// Rows of the official form.
    #[must_use]
    pub fn form(&self, operation_code: &str) -> DeclarationForm {
        let nif = self.church.as_ref().and_then(|c| c.nif.as_deref());
        DeclarationForm::from_declaration(&self.declaration, nif, self.year, operation_code)
    }
}

/// Builds the fiscal documents of a church.
#[derive(Clone)]
pub struct FiscalReportService {
    db: DatabaseConnection,
    config: Arc<DocumentsConfig>,
}

impl FiscalReportService {
    /// Creates the service.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: Arc<DocumentsConfig>) -> Self {
        Self { db, config }
    }

    /// Per-donor totals of `church_id` in `year`, ordered by donor name.
    pub async fn aggregate(
        &self,
        church_id: ChurchId,
        year: FiscalYear,
    ) -> Result<Vec<DonorTotal>, ApiError> {
        let (records, donors) = ContributionRepository::new(self.db.clone())
            .donations_for_year(church_id, year)
            .await?;

        Ok(DonorAggregator::aggregate(church_id, year, &records, &donors))
    }

    /// Splits the year's donors into declarable and excluded.
    ///
    /// An unknown church yields an empty declaration.
    pub async fn declaration(
        &self,
        church_id: ChurchId,
        year: FiscalYear,
    ) -> Result<ChurchDeclaration, ApiError> {
        let church = ChurchRepository::new(self.db.clone())
            .find_by_id(church_id.into_inner())
            .await?;
        let country = TaxCountry::from_church_country(
            church.as_ref().and_then(|c| c.country.as_deref()),
        );

        let totals = self.aggregate(church_id, year).await?;
        let declaration = Declaration::partition(totals, country);

        if !declaration.excluded.is_empty() {
            warn!(
                church_id = %church_id,
                year = %year,
                excluded = declaration.stats.excluded_donors,
                excluded_amount = %declaration.stats.excluded_amount,
                "Donors left out of the declaration for a missing or invalid tax id"
            );
        }

        Ok(ChurchDeclaration {
            church,
            year,
            declaration,
        })
    }

    /// Spreadsheet version of the declaration.
    pub async fn spreadsheet(
        &self,
        church_id: ChurchId,
        year: FiscalYear,
    ) -> Result<RenderedDocument, ApiError> {
        let form = self.form(church_id, year).await?;
        let document = SpreadsheetFiller::render(&form)?;
        log_generated(church_id, year, &form, &document);
        Ok(document)
    }

    /// The official form template with the declaration written on it.
    pub async fn form_pdf(
        &self,
        church_id: ChurchId,
        year: FiscalYear,
    ) -> Result<RenderedDocument, ApiError> {
        let form = self.form(church_id, year).await?;
        let template = FormTemplate::read(&self.config.template_path).await?;
        let document = TemplateOverlay::default().fill(&template, &form)?;
        log_generated(church_id, year, &form, &document);
        Ok(document)
    }

    /// Self-drawn A4 rendition of the form.
    pub async fn report_pdf(
        &self,
        church_id: ChurchId,
        year: FiscalYear,
    ) -> Result<RenderedDocument, ApiError> {
        let form = self.form(church_id, year).await?;
        let document = OfficialReport::render(&form)?;
        log_generated(church_id, year, &form, &document);
        Ok(document)
    }

    /// Annual receipt of one member.
    ///
    /// Fails with 404 when the member does not belong to the church or gave
    /// nothing in `year`.
    pub async fn donor_receipt(
        &self,
        church_id: ChurchId,
        member_id: MemberId,
        year: FiscalYear,
    ) -> Result<RenderedDocument, ApiError> {
        let church = ChurchRepository::new(self.db.clone())
            .find_by_id(church_id.into_inner())
            .await?
            .ok_or_else(|| ApiError::not_found("Church not found"))?;

        MemberRepository::new(self.db.clone())
            .find_in_church(church_id.into_inner(), member_id.into_inner())
            .await?
            .ok_or_else(|| ApiError::not_found("Member not found"))?;

        let total = self
            .aggregate(church_id, year)
            .await?
            .into_iter()
            .find(|total| total.donor.id == member_id)
            .ok_or_else(|| ApiError::not_found(format!("No donations recorded in {year}")))?;

        let document = DonorReceipt::render(&issuer(&church), &total, year)?;
        info!(
            church_id = %church_id,
            member_id = %member_id,
            year = %year,
            total = %total.total_amount,
            filename = %document.filename,
            "Generated donor receipt"
        );
        Ok(document)
    }

    async fn form(
        &self,
        church_id: ChurchId,
        year: FiscalYear,
    ) -> Result<DeclarationForm, ApiError> {
        Ok(self
            .declaration(church_id, year)
            .await?
            .form(&self.config.operation_code))
    }
}

/// The church as printed on receipts.
#[must_use]
pub fn issuer(church: &churches::Model) -> Issuer {
    let address = match (church.address.as_deref(), church.city.as_deref()) {
        (Some(street), Some(city)) => Some(format!("{street}, {city}")),
        (Some(street), None) => Some(street.to_string()),
        (None, Some(city)) => Some(city.to_string()),
        (None, None) => None,
    };

    Issuer {
        name: church.name.clone(),
        nif: church.nif.clone(),
        address,
    }
}

fn log_generated(
    church_id: ChurchId,
    year: FiscalYear,
    form: &DeclarationForm,
    document: &RenderedDocument,
) {
    info!(
        church_id = %church_id,
        year = %year,
        rows = form.rows.len(),
        total = %form.total,
        filename = %document.filename,
        "Generated declaration"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn church(address: Option<&str>, city: Option<&str>) -> churches::Model {
        churches::Model {
            id: Uuid::now_v7(),
            name: "Igreja Central".to_string(),
            nif: Some("501964843".to_string()),
            address: address.map(str::to_string),
            city: city.map(str::to_string),
            country: Some("Portugal".to_string()),
            currency_symbol: "€".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issuer_address() {
        assert_eq!(
            issuer(&church(Some("Rua A 1"), Some("Porto"))).address.as_deref(),
            Some("Rua A 1, Porto")
        );
        assert_eq!(
            issuer(&church(None, Some("Porto"))).address.as_deref(),
            Some("Porto")
        );
        assert_eq!(issuer(&church(None, None)).address, None);
    }

    #[test]
    fn test_form_of_unknown_church_has_no_declarant() {
        let declaration = ChurchDeclaration {
            church: None,
            year: FiscalYear::new(2025).unwrap(),
            declaration: Declaration::default(),
        };

        let form = declaration.form("01");

        assert_eq!(form.declarant_nif, None);
        assert!(form.rows.is_empty());
    }
}
