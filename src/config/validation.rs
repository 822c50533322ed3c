//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, confirmations >= 1)
//! - Check the dependency is either a valid address or a deploy block
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DeployConfig → Result<(), Vec<ValidationError>>
//! - URLs and keys are not checked here; they fail later at the provider
//! - Network selection is checked at resolution, where `--network` is known

use thiserror::Error;

use crate::config::schema::DeployConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("compiler version '{0}' is not of the form MAJOR.MINOR.PATCH")]
    InvalidCompilerVersion(String),

    #[error("{0}: contract name must be a non-empty identifier")]
    EmptyContractName(&'static str),

    #[error("deployment.dependency needs either `address` or `deploy`")]
    MissingDependency,

    #[error("deployment.dependency sets both `address` and `deploy`; pick one")]
    AmbiguousDependency,

    #[error("invalid dependency address '{value}': {reason}")]
    InvalidDependencyAddress { value: String, reason: String },

    #[error("network '{network}': {field} must be greater than zero")]
    ZeroValue {
        network: String,
        field: &'static str,
    },
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DeployConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(version) = &config.compiler.version {
        if let Err(e) = check_compiler_version(version) {
            errors.push(e);
        }
    }

    if !is_identifier(&config.deployment.contract) {
        errors.push(ValidationError::EmptyContractName("deployment.contract"));
    }

    if let Err(e) = config.deployment.dependency.source() {
        errors.push(e);
    }

    for (name, network) in &config.networks {
        let checks = [
            ("rpc_timeout_secs", network.rpc_timeout_secs == 0),
            ("confirmation_blocks", network.confirmation_blocks == 0),
            ("poll_interval_ms", network.poll_interval_ms == 0),
        ];
        for (field, is_zero) in checks {
            if is_zero {
                errors.push(ValidationError::ZeroValue {
                    network: name.clone(),
                    field,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a solc version string such as `0.8.20`.
pub fn check_compiler_version(version: &str) -> Result<(), ValidationError> {
    let parts: Vec<&str> = version.split('.').collect();
    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::InvalidCompilerVersion(version.to_string()))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;

    const VALID: &str = r#"
        [compiler]
        version = "0.8.20"

        [networks.bsctestnet]
        url_env = "BSC_TEST_URL"

        [deployment]
        contract = "Athena"

        [deployment.dependency]
        address = "0xf2d20C24314C0147D9bDA97F0Cf0BbA7A7e3afda"
    "#;

    #[test]
    fn test_valid_config_passes() {
        let config: DeployConfig = toml::from_str(VALID).unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_compiler_version_format() {
        assert!(check_compiler_version("0.8.20").is_ok());
        assert!(check_compiler_version("0.8").is_err());
        assert!(check_compiler_version("v0.8.20").is_err());
        assert!(check_compiler_version("").is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let config: DeployConfig = toml::from_str(
            r#"
            default_network = "mainnet"

            [compiler]
            version = "latest"

            [networks.bsctestnet]
            confirmation_blocks = 0

            [deployment]
            contract = ""

            [deployment.dependency]
            "#,
        )
        .unwrap();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::MissingDependency));
        assert!(errors.contains(&ValidationError::ZeroValue {
            network: "bsctestnet".into(),
            field: "confirmation_blocks",
        }));
    }

    #[test]
    fn test_missing_compiler_version_is_not_a_file_error() {
        // The version may still arrive through COMPILER_VERSION at resolution time.
        let config = parse_config(&VALID.replace("version = \"0.8.20\"", "")).unwrap();
        assert!(config.compiler.version.is_none());
    }

    #[test]
    fn test_undefined_default_network_is_left_to_resolution() {
        let config = parse_config(&VALID.replace("bsctestnet", "local")).unwrap();
        assert_eq!(config.default_network, "bsctestnet");
        assert!(config.networks.contains_key("local"));
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_identifier("Athena"));
        assert!(is_identifier("_Mock$Token2"));
        assert!(!is_identifier("2Athena"));
        assert!(!is_identifier("Athena.sol"));
    }
}
