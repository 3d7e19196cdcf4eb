use crate::config::SplitConfig;
use crate::utils::error::{Result, SplitError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk configuration. Every section is optional; anything left out falls
/// back to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub split: SplitSection,
    #[serde(default)]
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub path: Option<String>,
    pub address_column: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitSection {
    pub cities: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    pub output_dir: Option<String>,
    pub output_pattern: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SplitError::Config {
            message: format!("cannot read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Parse `content`, resolving `${VAR}` references through `lookup`.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| SplitError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with `lookup(VAR)`; unresolved variables are left as is.
    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SplitError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().is_some_and(|m| m.enabled)
    }

    pub fn into_split_config(self) -> SplitConfig {
        let defaults = SplitConfig::default();
        SplitConfig {
            input_path: self.source.path.unwrap_or(defaults.input_path),
            output_dir: self.load.output_dir.unwrap_or(defaults.output_dir),
            address_column: self.source.address_column.unwrap_or(defaults.address_column),
            cities: self.split.cities.unwrap_or(defaults.cities),
            output_pattern: self.load.output_pattern.unwrap_or(defaults.output_pattern),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_split_config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[source]
path = "members.csv"
address_column = "street_address"

[split]
cities = ["Brampton", "Oakville"]

[load]
output_dir = "./by-city"
output_pattern = "members_{label}.csv"

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.monitoring_enabled());

        let split = config.into_split_config();
        assert_eq!(split.input_path, "members.csv");
        assert_eq!(split.address_column, "street_address");
        assert_eq!(split.cities, vec!["Brampton", "Oakville"]);
        assert_eq!(split.output_dir, "./by-city");
        assert_eq!(split.output_pattern, "members_{label}.csv");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(!config.monitoring_enabled());
        assert_eq!(config.into_split_config(), SplitConfig::default());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = TomlConfig::from_toml_str("[source]\nfile = \"x.csv\"\n").unwrap_err();
        assert!(matches!(err, SplitError::Config { .. }));
    }

    #[test]
    fn test_var_substitution() {
        let vars: HashMap<&str, &str> = HashMap::from([("SPLIT_INPUT", "from_env.csv")]);

        let toml_content = r#"
[source]
path = "${SPLIT_INPUT}"

[load]
output_dir = "${SPLIT_UNSET_DIR}"
"#;

        let config = TomlConfig::from_toml_str_with(toml_content, |name| {
            vars.get(name).map(|v| v.to_string())
        })
        .unwrap();
        assert_eq!(config.source.path.as_deref(), Some("from_env.csv"));
        assert_eq!(
            config.load.output_dir.as_deref(),
            Some("${SPLIT_UNSET_DIR}")
        );
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[load]\noutput_pattern = \"static.csv\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[split]\ncities = [\"Etobicoke\"]\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.split.cities, Some(vec!["Etobicoke".to_string()]));
    }

    #[test]
    fn test_missing_config_file() {
        let err = TomlConfig::from_file("/nonexistent/split.toml").unwrap_err();
        assert!(matches!(err, SplitError::Config { .. }));
    }
}
