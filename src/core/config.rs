use crate::core::error::InvalidInputError;
use crate::core::pricing::{FixedCostTable, PriceBook, ServiceName};
use crate::core::proposal::{DEFAULT_TITLE, ProposalOptions};
use crate::core::writer::OutputFormat;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProposalConfig {
    pub title: String,
    pub filename: String,
    pub format: OutputFormat,
    pub output_dir: Option<String>,
}

impl Default for ProposalConfig {
    fn default() -> Self {
        ProposalConfig {
            title: DEFAULT_TITLE.to_string(),
            filename: "nadi_proposal".to_string(),
            format: OutputFormat::Text,
            output_dir: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct PricingConfig {
    pub fixed_costs: BTreeMap<ServiceName, Decimal>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_company_name")]
    pub company_name: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub proposal: ProposalConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

fn default_company_name() -> String {
    "Nadi Group".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            company_name: default_company_name(),
            currency_symbol: default_currency_symbol(),
            proposal: ProposalConfig::default(),
            pricing: PricingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists there yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "nadigroup", "landquote")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Price book built from the standard table plus configured overrides.
    pub fn price_book(&self) -> Result<PriceBook, InvalidInputError> {
        let fixed = FixedCostTable::with_overrides(&self.pricing.fixed_costs)?;
        Ok(PriceBook::new(fixed))
    }

    pub fn proposal_options(&self) -> ProposalOptions {
        ProposalOptions {
            title: self.proposal.title.clone(),
            currency_symbol: self.currency_symbol.clone(),
        }
    }

    /// Where a proposal in `format` is written when no explicit path is given.
    pub fn proposal_path(&self, format: OutputFormat) -> Result<PathBuf> {
        let dir = match &self.proposal.output_dir {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir().context("Could not determine current directory")?,
        };
        Ok(dir.join(format!(
            "{}.{}",
            self.proposal.filename,
            format.extension()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
company_name: "Acme Planning"
currency_symbol: "€"
proposal:
  title: "Fee Proposal"
  filename: "acme_proposal"
  format: html
  output_dir: "/tmp/proposals"
pricing:
  fixed_costs:
    "Base Plan & Site Layout Details": 1600
    "Site Inspection and Field Consultation": 3250.50
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.company_name, "Acme Planning");
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.proposal.title, "Fee Proposal");
        assert_eq!(config.proposal.format, OutputFormat::Html);
        assert_eq!(
            config.pricing.fixed_costs.get(&ServiceName::BasePlan),
            Some(&dec!(1600))
        );

        let book = config.price_book().unwrap();
        assert_eq!(
            book.fixed_costs().get(ServiceName::SiteInspection),
            Some(dec!(3250.50))
        );
        assert_eq!(
            book.fixed_costs().get(ServiceName::AdditionalSiteVisits),
            Some(dec!(2000))
        );

        assert_eq!(
            config.proposal_path(OutputFormat::Html).unwrap(),
            PathBuf::from("/tmp/proposals/acme_proposal.html")
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.company_name, "Nadi Group");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.proposal.title, "PROPOSAL DOCUMENT");
        assert_eq!(config.proposal.filename, "nadi_proposal");
        assert_eq!(config.proposal.format, OutputFormat::Text);
        assert!(config.pricing.fixed_costs.is_empty());

        let options = config.proposal_options();
        assert_eq!(options.title, "PROPOSAL DOCUMENT");
        assert_eq!(options.currency_symbol, "$");
    }

    #[test]
    fn test_unknown_service_in_fixed_costs_is_rejected() {
        let yaml_str = r#"
pricing:
  fixed_costs:
    "Landscaping": 100
"#;
        assert!(serde_yaml::from_str::<AppConfig>(yaml_str).is_err());
    }

    #[test]
    fn test_negative_fixed_cost_is_rejected() {
        let yaml_str = r#"
pricing:
  fixed_costs:
    "Base Plan & Site Layout Details": -10
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert!(matches!(
            config.price_book(),
            Err(InvalidInputError::NegativeFixedCost { .. })
        ));
    }
}
