use crate::utils::error::{Result, SplitError};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SplitError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SplitError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SplitError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Labels must be non-blank and distinct after lower-casing, since two labels
/// differing only in case would write to the same file.
pub fn validate_labels(field_name: &str, labels: &[String]) -> Result<()> {
    if labels.is_empty() {
        return Err(SplitError::MissingConfig {
            field: field_name.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for label in labels {
        validate_non_empty_string(field_name, label)?;
        if label.contains('/') || label.contains('\\') {
            return Err(SplitError::InvalidConfigValue {
                field: field_name.to_string(),
                value: label.clone(),
                reason: "Label becomes part of a file name and cannot contain path separators"
                    .to_string(),
            });
        }
        if !seen.insert(label.to_lowercase()) {
            return Err(SplitError::InvalidConfigValue {
                field: field_name.to_string(),
                value: label.clone(),
                reason: "Duplicate label (labels are compared case-insensitively)".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_output_pattern(field_name: &str, pattern: &str) -> Result<()> {
    if !pattern.contains(crate::core::split::LABEL_PLACEHOLDER) {
        return Err(SplitError::InvalidConfigValue {
            field: field_name.to_string(),
            value: pattern.to_string(),
            reason: format!("Pattern must contain {}", crate::core::split::LABEL_PLACEHOLDER),
        });
    }

    if pattern.contains('/') || pattern.contains('\\') {
        return Err(SplitError::InvalidConfigValue {
            field: field_name.to_string(),
            value: pattern.to_string(),
            reason: "Pattern is a file name; use the output directory for paths".to_string(),
        });
    }

    Ok(())
}
