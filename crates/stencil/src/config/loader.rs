use std::path::Path;

use crate::config::schema::{ConfigFormat, InferenceConfig};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/inference-config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<InferenceConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let format = ConfigFormat::from_extension(extension).ok_or_else(|| ConfigError::Validation {
        message: format!("Unsupported config file extension: '{}'", extension),
    })?;

    load_config_from_str(&content, format)
}

pub fn load_config_from_str(
    content: &str,
    format: ConfigFormat,
) -> Result<InferenceConfig, ConfigError> {
    let json_value: serde_json::Value = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
    };

    validate_schema(&json_value)?;

    let config: InferenceConfig = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let compiled = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = compiled
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &InferenceConfig) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    let thresholds = &config.thresholds;
    for (name, value) in [
        ("similarity", thresholds.similarity),
        ("static_majority", thresholds.static_majority),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Validation {
                message: format!("Threshold '{}' must be within 0..=1, got {}", name, value),
            });
        }
    }

    for (name, value) in [
        ("page_required_percentage", thresholds.page_required_percentage),
        (
            "block_optional_below_percentage",
            thresholds.block_optional_below_percentage,
        ),
        ("common_element_percentage", thresholds.common_element_percentage),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(ConfigError::Validation {
                message: format!("Threshold '{}' must be within 0..=100, got {}", name, value),
            });
        }
    }

    if config.extraction.concurrency == 0 {
        return Err(ConfigError::Validation {
            message: "Extraction concurrency must be at least 1".to_string(),
        });
    }

    Ok(())
}
