use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Input file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to parse '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SplitError {
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } | Self::Parse { .. } | Self::Csv(_) => ErrorCategory::Input,
            Self::Write { .. } | Self::Serialization(_) => ErrorCategory::Output,
            Self::Config { .. } | Self::InvalidConfigValue { .. } | Self::MissingConfig { .. } => {
                ErrorCategory::Configuration
            }
            Self::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config { .. } | Self::InvalidConfigValue { .. } | Self::MissingConfig { .. } => {
                ErrorSeverity::Medium
            }
            Self::NotFound { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Check the --input path or run from the directory holding the CSV",
            Self::Parse { .. } | Self::Csv(_) => {
                "Make sure the file is comma-delimited UTF-8 with a header row containing the address column"
            }
            Self::Write { .. } => "Check permissions and free space in the output directory",
            Self::Config { .. } | Self::InvalidConfigValue { .. } | Self::MissingConfig { .. } => {
                "Review the command-line flags or the TOML configuration file"
            }
            Self::Io(_) | Self::Serialization(_) => "Retry the run; if it persists, check the file system",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { path } => format!("Cannot find input file '{}'", path),
            Self::Parse { path, message } => format!("'{}' is not a usable CSV file: {}", path, message),
            Self::Write { path, .. } => format!("Could not write output file '{}'", path),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_severity() {
        let not_found = SplitError::NotFound {
            path: "missing.csv".to_string(),
        };
        assert_eq!(not_found.category(), ErrorCategory::Input);
        assert_eq!(not_found.exit_code(), 3);

        let config = SplitError::Config {
            message: "bad".to_string(),
        };
        assert_eq!(config.exit_code(), 2);

        let write = SplitError::Write {
            path: "out.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(write.category(), ErrorCategory::Output);
        assert_eq!(write.exit_code(), 1);
    }

    #[test]
    fn test_user_friendly_message_names_the_file() {
        let err = SplitError::parse("data.csv", "missing column 'address'");
        assert!(err.user_friendly_message().contains("data.csv"));
        assert!(err.to_string().contains("missing column 'address'"));
    }
}
