#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT_PATH: &str = "mastoorat_master_gta.csv";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_ADDRESS_COLUMN: &str = "address";
pub const DEFAULT_OUTPUT_PATTERN: &str = "mastoorat_{label}.csv";
pub const DEFAULT_CITIES: [&str; 4] = ["Brampton", "Toronto", "Mississauga", "Etobicoke"];

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub input_path: String,
    pub output_dir: String,
    pub address_column: String,
    pub cities: Vec<String>,
    pub output_pattern: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            input_path: DEFAULT_INPUT_PATH.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            address_column: DEFAULT_ADDRESS_COLUMN.to_string(),
            cities: DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
            output_pattern: DEFAULT_OUTPUT_PATTERN.to_string(),
        }
    }
}

impl ConfigProvider for SplitConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn address_column(&self) -> &str {
        &self.address_column
    }

    fn cities(&self) -> &[String] {
        &self.cities
    }

    fn output_pattern(&self) -> &str {
        &self.output_pattern
    }
}

impl Validate for SplitConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input_path)?;
        validation::validate_path("output_dir", &self.output_dir)?;
        validation::validate_non_empty_string("address_column", &self.address_column)?;
        validation::validate_labels("cities", &self.cities)?;
        validation::validate_output_pattern("output_pattern", &self.output_pattern)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SplitConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.input_path(), "mastoorat_master_gta.csv");
        assert_eq!(
            config.cities(),
            &["Brampton", "Toronto", "Mississauga", "Etobicoke"]
        );
    }

    #[test]
    fn test_input_path_extension_is_not_restricted() {
        // any delimited text file is accepted; a missing one fails later as not found
        for input in ["members.tsv", "export.txt", "gta"] {
            let config = SplitConfig {
                input_path: input.to_string(),
                ..SplitConfig::default()
            };
            assert!(config.validate().is_ok(), "{}", input);
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SplitConfig {
            cities: vec![],
            ..SplitConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
