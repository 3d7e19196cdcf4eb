use crate::config::toml_config::TomlConfig;
use crate::config::SplitConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "csv-city-split")]
#[command(about = "Split a CSV file into one file per city found in its address column")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Input CSV file [default: mastoorat_master_gta.csv]
    #[arg(short, long)]
    pub input: Option<String>,

    /// Directory for the per-city files [default: .]
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Comma separated city labels [default: Brampton,Toronto,Mississauga,Etobicoke]
    #[arg(long, value_delimiter = ',')]
    pub cities: Option<Vec<String>>,

    /// Column holding the address text [default: address]
    #[arg(long)]
    pub address_column: Option<String>,

    /// Output file name, `{label}` is replaced by the lower-cased city
    #[arg(long)]
    pub output_pattern: Option<String>,

    /// Show what would be written without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Also append logs to a daily file `logs.<date>.txt` in this directory
    #[arg(long)]
    pub log_dir: Option<String>,

    /// Log CPU and memory usage per phase
    #[arg(long)]
    pub monitor: bool,
}

/// Settings after merging the TOML file (if any) with command-line flags.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub split: SplitConfig,
    pub monitor: bool,
}

impl CliConfig {
    pub fn resolve(&self) -> Result<ResolvedSettings> {
        let (base, toml_monitor) = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let toml = TomlConfig::from_file(path)?;
                let monitor = toml.monitoring_enabled();
                (toml.into_split_config(), monitor)
            }
            None => (SplitConfig::default(), false),
        };

        Ok(ResolvedSettings {
            split: self.apply_overrides(base),
            monitor: self.monitor || toml_monitor,
        })
    }

    /// Flags given on the command line win over `base`.
    pub fn apply_overrides(&self, mut base: SplitConfig) -> SplitConfig {
        if let Some(input) = &self.input {
            base.input_path = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            base.output_dir = output_dir.clone();
        }
        if let Some(cities) = &self.cities {
            base.cities = cities.iter().map(|c| c.trim().to_string()).collect();
        }
        if let Some(column) = &self.address_column {
            base.address_column = column.clone();
        }
        if let Some(pattern) = &self.output_pattern {
            base.output_pattern = pattern.clone();
        }
        base
    }
}
