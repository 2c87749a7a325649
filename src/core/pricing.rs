//! Pricing rules for land-planning engagements.
//!
//! A quote is a pure function of the selected package, the acreage and the
//! requested add-ons. Every billable service is priced either from the
//! fixed-cost table or from an acreage formula; the fixed table wins when a
//! service appears in both.

use crate::core::error::InvalidInputError;
use crate::core::money::format_currency;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

/// The retainer is the total cost divided by this.
pub const RETAINER_DIVISOR: Decimal = dec!(2);

const DAYS_PER_ACRE: Decimal = dec!(7);
const MASTER_PLANNING_DAY_RATE: Decimal = dec!(70);
const CAD_DAY_RATE: Decimal = dec!(30);
const SKETCH_SHARE: Decimal = dec!(0.75);
const REVISIONS_SHARE: Decimal = dec!(0.40);

/// Research & bubble diagram brackets, highest first. An acreage exactly on
/// a threshold falls into the bracket below it.
const BUBBLE_DIAGRAM_TIERS: [(Decimal, Decimal); 6] = [
    (dec!(200), dec!(8500)),
    (dec!(100), dec!(6500)),
    (dec!(50), dec!(5000)),
    (dec!(30), dec!(3850)),
    (dec!(20), dec!(3000)),
    (dec!(10), dec!(2275)),
];
const BUBBLE_DIAGRAM_FLOOR: Decimal = dec!(1750);

/// A billable line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ServiceName {
    #[serde(rename = "Base Plan & Site Layout Details")]
    BasePlan,
    #[serde(rename = "Site Inspection and Field Consultation")]
    SiteInspection,
    #[serde(rename = "Additional Site Visits & Meetings")]
    AdditionalSiteVisits,
    #[serde(rename = "Research, Bubble Diagram & Site Analysis")]
    ResearchBubbleDiagram,
    #[serde(rename = "Final / Comprehensive Master Planning")]
    FinalMasterPlanning,
    #[serde(rename = "Sketch / Illustrative / Concept Master Plan")]
    SketchConceptPlan,
    #[serde(rename = "CAD (Engineer-ready) Package")]
    CadEngineerPackage,
    #[serde(rename = "Additional Revisions to Final Master Plan")]
    AdditionalRevisions,
}

impl ServiceName {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceName::BasePlan => "Base Plan & Site Layout Details",
            ServiceName::SiteInspection => "Site Inspection and Field Consultation",
            ServiceName::AdditionalSiteVisits => "Additional Site Visits & Meetings",
            ServiceName::ResearchBubbleDiagram => "Research, Bubble Diagram & Site Analysis",
            ServiceName::FinalMasterPlanning => "Final / Comprehensive Master Planning",
            ServiceName::SketchConceptPlan => "Sketch / Illustrative / Concept Master Plan",
            ServiceName::CadEngineerPackage => "CAD (Engineer-ready) Package",
            ServiceName::AdditionalRevisions => "Additional Revisions to Final Master Plan",
        }
    }

    /// The acreage formula pricing this service, if it is variable-cost.
    pub fn formula(&self) -> Option<AcreageFormula> {
        match self {
            ServiceName::ResearchBubbleDiagram => Some(AcreageFormula::ResearchBubbleDiagram),
            ServiceName::FinalMasterPlanning => Some(AcreageFormula::FinalMasterPlanning),
            ServiceName::SketchConceptPlan => Some(AcreageFormula::SketchConceptPlan),
            ServiceName::CadEngineerPackage => Some(AcreageFormula::CadEngineerPackage),
            ServiceName::AdditionalRevisions => Some(AcreageFormula::AdditionalRevisions),
            ServiceName::BasePlan
            | ServiceName::SiteInspection
            | ServiceName::AdditionalSiteVisits => None,
        }
    }
}

impl Display for ServiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn research_bubble_diagram(acres: Decimal) -> Decimal {
    BUBBLE_DIAGRAM_TIERS
        .iter()
        .find(|(threshold, _)| acres > *threshold)
        .map_or(BUBBLE_DIAGRAM_FLOOR, |(_, amount)| *amount)
}

// The linear formulas return `None` when the acreage is too large to price.

pub fn final_master_planning(acres: Decimal) -> Option<Decimal> {
    acres
        .checked_mul(DAYS_PER_ACRE)?
        .checked_mul(MASTER_PLANNING_DAY_RATE)
}

pub fn sketch_concept_plan(acres: Decimal) -> Option<Decimal> {
    final_master_planning(acres)?.checked_mul(SKETCH_SHARE)
}

pub fn cad_engineer_package(acres: Decimal) -> Option<Decimal> {
    acres.checked_mul(DAYS_PER_ACRE)?.checked_mul(CAD_DAY_RATE)
}

pub fn additional_revisions(acres: Decimal) -> Option<Decimal> {
    final_master_planning(acres)?.checked_mul(REVISIONS_SHARE)
}

/// Acreage-driven pricing of a variable-cost service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcreageFormula {
    ResearchBubbleDiagram,
    FinalMasterPlanning,
    SketchConceptPlan,
    CadEngineerPackage,
    AdditionalRevisions,
}

impl AcreageFormula {
    pub fn evaluate(&self, acres: Decimal) -> Option<Decimal> {
        match self {
            AcreageFormula::ResearchBubbleDiagram => Some(research_bubble_diagram(acres)),
            AcreageFormula::FinalMasterPlanning => final_master_planning(acres),
            AcreageFormula::SketchConceptPlan => sketch_concept_plan(acres),
            AcreageFormula::CadEngineerPackage => cad_engineer_package(acres),
            AcreageFormula::AdditionalRevisions => additional_revisions(acres),
        }
    }

    /// Human readable rate, derived from the same constants used to price.
    pub fn describe(&self, currency_symbol: &str) -> String {
        let per_acre = |rate: Decimal| {
            format!(
                "{} per acre",
                format_currency(DAYS_PER_ACRE * rate, currency_symbol)
            )
        };
        let share = |ratio: Decimal| {
            format!("{}% of Final Master Planning", (ratio * dec!(100)).normalize())
        };
        match self {
            AcreageFormula::ResearchBubbleDiagram => format!(
                "tiered {} to {} by acreage",
                format_currency(BUBBLE_DIAGRAM_FLOOR, currency_symbol),
                format_currency(BUBBLE_DIAGRAM_TIERS[0].1, currency_symbol)
            ),
            AcreageFormula::FinalMasterPlanning => per_acre(MASTER_PLANNING_DAY_RATE),
            AcreageFormula::CadEngineerPackage => per_acre(CAD_DAY_RATE),
            AcreageFormula::SketchConceptPlan => share(SKETCH_SHARE),
            AcreageFormula::AdditionalRevisions => share(REVISIONS_SHARE),
        }
    }
}

/// How a service is priced by a [`PriceBook`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    Fixed(Decimal),
    Acreage(AcreageFormula),
}

impl Rate {
    /// `None` when an acreage formula overflows.
    pub fn amount(&self, acres: Decimal) -> Option<Decimal> {
        match self {
            Rate::Fixed(amount) => Some(*amount),
            Rate::Acreage(formula) => formula.evaluate(acres),
        }
    }

    pub fn describe(&self, currency_symbol: &str) -> String {
        match self {
            Rate::Fixed(amount) => format_currency(*amount, currency_symbol),
            Rate::Acreage(formula) => formula.describe(currency_symbol),
        }
    }
}

/// Fixed amounts per service. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedCostTable {
    costs: BTreeMap<ServiceName, Decimal>,
}

impl FixedCostTable {
    pub fn standard() -> Self {
        let costs = BTreeMap::from([
            (ServiceName::BasePlan, dec!(1450)),
            (ServiceName::SiteInspection, dec!(3000)),
            (ServiceName::AdditionalSiteVisits, dec!(2000)),
        ]);
        Self { costs }
    }

    /// Standard table with `overrides` layered on top.
    pub fn with_overrides(
        overrides: &BTreeMap<ServiceName, Decimal>,
    ) -> Result<Self, InvalidInputError> {
        let mut table = Self::standard();
        for (service, amount) in overrides {
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(InvalidInputError::NegativeFixedCost {
                    service: service.to_string(),
                    amount: *amount,
                });
            }
            debug!(%service, %amount, "Overriding fixed cost");
            table.costs.insert(*service, *amount);
        }
        Ok(table)
    }

    pub fn get(&self, service: ServiceName) -> Option<Decimal> {
        self.costs.get(&service).copied()
    }
}

impl Default for FixedCostTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Named bundle of services offered as a single option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Package {
    ConceptSketchPlan,
    MasterPlanWithoutInspection,
    ComprehensiveMasterPlan,
    ComprehensiveMasterPlanWithCad,
}

impl Package {
    pub const ALL: [Package; 4] = [
        Package::ConceptSketchPlan,
        Package::MasterPlanWithoutInspection,
        Package::ComprehensiveMasterPlan,
        Package::ComprehensiveMasterPlanWithCad,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Package::ConceptSketchPlan => "concept",
            Package::MasterPlanWithoutInspection => "master",
            Package::ComprehensiveMasterPlan => "comprehensive",
            Package::ComprehensiveMasterPlanWithCad => "comprehensive-cad",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Package::ConceptSketchPlan => "Concept (Sketch) Plan",
            Package::MasterPlanWithoutInspection => "Master Plan (Without Inspection)",
            Package::ComprehensiveMasterPlan => "Comprehensive Master Plan",
            Package::ComprehensiveMasterPlanWithCad => "Comprehensive Master Plan & CAD Package",
        }
    }

    /// Services included in the package, in billing order.
    pub fn services(&self) -> &'static [ServiceName] {
        use ServiceName::*;
        match self {
            Package::ConceptSketchPlan => &[BasePlan, SketchConceptPlan],
            Package::MasterPlanWithoutInspection => {
                &[BasePlan, ResearchBubbleDiagram, FinalMasterPlanning]
            }
            Package::ComprehensiveMasterPlan => &[
                BasePlan,
                SiteInspection,
                ResearchBubbleDiagram,
                FinalMasterPlanning,
            ],
            Package::ComprehensiveMasterPlanWithCad => &[
                BasePlan,
                SiteInspection,
                ResearchBubbleDiagram,
                FinalMasterPlanning,
                CadEngineerPackage,
            ],
        }
    }
}

impl Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Package {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Package::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(needle) || p.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| InvalidInputError::UnknownPackage(s.to_string()))
    }
}

impl TryFrom<String> for Package {
    type Error = InvalidInputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Package> for String {
    fn from(package: Package) -> Self {
        package.key().to_string()
    }
}

/// Optional service billed on top of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AddOn {
    SiteVisits,
    Revisions,
}

impl AddOn {
    pub const ALL: [AddOn; 2] = [AddOn::SiteVisits, AddOn::Revisions];

    pub fn key(&self) -> &'static str {
        match self {
            AddOn::SiteVisits => "site-visits",
            AddOn::Revisions => "revisions",
        }
    }

    pub fn service(&self) -> ServiceName {
        match self {
            AddOn::SiteVisits => ServiceName::AdditionalSiteVisits,
            AddOn::Revisions => ServiceName::AdditionalRevisions,
        }
    }

    pub fn name(&self) -> &'static str {
        self.service().name()
    }
}

impl Display for AddOn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AddOn {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        AddOn::ALL
            .into_iter()
            .find(|a| a.key().eq_ignore_ascii_case(needle) || a.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| InvalidInputError::UnknownAddOn(s.to_string()))
    }
}

impl TryFrom<String> for AddOn {
    type Error = InvalidInputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AddOn> for String {
    fn from(add_on: AddOn) -> Self {
        add_on.key().to_string()
    }
}

/// Pricing inputs for a single quote. Built once per request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteInput {
    pub acreage: Decimal,
    pub package: Option<Package>,
    pub add_ons: Vec<AddOn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineSource {
    Package,
    AddOn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub service: ServiceName,
    pub amount: Decimal,
    pub source: LineSource,
}

/// A computed quote. `total_cost` is the sum of `line_items` and
/// `retainer_fee` is exactly half of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteResult {
    pub package: Package,
    pub acreage: Decimal,
    pub add_ons: Vec<AddOn>,
    pub line_items: Vec<LineItem>,
    pub total_cost: Decimal,
    pub retainer_fee: Decimal,
}

impl QuoteResult {
    pub fn package_subtotal(&self) -> Decimal {
        self.line_items
            .iter()
            .filter(|item| item.source == LineSource::Package)
            .map(|item| item.amount)
            .sum()
    }
}

/// Fixed costs plus the acreage formulas; prices any service.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    fixed: FixedCostTable,
}

impl PriceBook {
    pub fn new(fixed: FixedCostTable) -> Self {
        Self { fixed }
    }

    pub fn fixed_costs(&self) -> &FixedCostTable {
        &self.fixed
    }

    pub fn rate_for(&self, service: ServiceName) -> Rate {
        match (self.fixed.get(service), service.formula()) {
            (Some(amount), _) => Rate::Fixed(amount),
            (None, Some(formula)) => Rate::Acreage(formula),
            (None, None) => Rate::Fixed(Decimal::ZERO),
        }
    }

    /// Checkbox-style label for an add-on, e.g.
    /// "Additional Site Visits & Meetings ($2,000.00)".
    pub fn add_on_label(&self, add_on: AddOn, currency_symbol: &str) -> String {
        format!(
            "{} ({})",
            add_on.name(),
            self.rate_for(add_on.service()).describe(currency_symbol)
        )
    }

    pub fn compute_quote(&self, input: &QuoteInput) -> Result<QuoteResult, InvalidInputError> {
        let package = input.package.ok_or(InvalidInputError::NoPackageSelected)?;

        let mut add_ons: Vec<AddOn> = Vec::with_capacity(input.add_ons.len());
        for add_on in &input.add_ons {
            if !add_ons.contains(add_on) {
                add_ons.push(*add_on);
            }
        }

        let lines: Vec<(ServiceName, LineSource)> = package
            .services()
            .iter()
            .map(|service| (*service, LineSource::Package))
            .chain(add_ons.iter().map(|a| (a.service(), LineSource::AddOn)))
            .collect();

        let needs_acreage = lines
            .iter()
            .any(|(service, _)| matches!(self.rate_for(*service), Rate::Acreage(_)));
        if needs_acreage && input.acreage <= Decimal::ZERO {
            return Err(InvalidInputError::NonPositiveAcreage {
                acres: input.acreage,
            });
        }

        let too_large = || InvalidInputError::AcreageTooLarge {
            acres: input.acreage,
        };

        let line_items: Vec<LineItem> = lines
            .into_iter()
            .map(|(service, source)| {
                let amount = self
                    .rate_for(service)
                    .amount(input.acreage)
                    .ok_or_else(too_large)?;
                debug!(%service, %amount, "Priced line item");
                Ok(LineItem {
                    service,
                    amount,
                    source,
                })
            })
            .collect::<Result<_, InvalidInputError>>()?;

        let total_cost = line_items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.amount))
            .ok_or_else(too_large)?;
        let retainer_fee = total_cost / RETAINER_DIVISOR;
        debug!(%package, acres = %input.acreage, %total_cost, %retainer_fee, "Computed quote");

        Ok(QuoteResult {
            package,
            acreage: input.acreage,
            add_ons,
            line_items,
            total_cost,
            retainer_fee,
        })
    }
}

/// Prices `input` against the standard fixed-cost table.
pub fn compute_quote(input: &QuoteInput) -> Result<QuoteResult, InvalidInputError> {
    PriceBook::default().compute_quote(input)
}
