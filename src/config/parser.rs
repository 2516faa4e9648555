use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is used to record which configuration produced a given corpus run.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok((Config, String))` - Successfully loaded configuration and its hash
/// * `Err(ConfigError)` - Failed to load or parse the configuration
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[archive]
base-url = "https://arxiv.org"
root-path = "/year/stat/19"
year-prefix = "19"
subjects = ["AP", "CO", "ME", "ML", "OT", "ST"]

[crawler]
monthly-caps = [409, 432, 423, 419, 499, 536, 428, 372, 438]
cooldown-base-secs = 300

[user-agent]
crawler-name = "Gleaner"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
corpus-path = "abstracts_all.txt"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.archive.year_prefix, "19");
        assert_eq!(config.archive.subjects.len(), 6);
        assert_eq!(config.crawler.monthly_caps.len(), 9);
        assert_eq!(config.crawler.cooldown_base_secs, 300);
        assert_eq!(config.output.corpus_path, "abstracts_all.txt");
    }

    #[test]
    fn test_cooldown_base_defaults_to_300() {
        let content = VALID_CONFIG.replace("cooldown-base-secs = 300\n", "");
        let file = create_temp_config(&content);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.crawler.cooldown_base_secs, 300);
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is not toml [");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_fails_validation() {
        let content = VALID_CONFIG.replace("year-prefix = \"19\"", "year-prefix = \"2019\"");
        let file = create_temp_config(&content);
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_config_hash_is_stable() {
        let file = create_temp_config(VALID_CONFIG);
        let h1 = compute_config_hash(file.path()).unwrap();
        let h2 = compute_config_hash(file.path()).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_config_hash_changes_with_content() {
        let a = create_temp_config(VALID_CONFIG);
        let b = create_temp_config(&VALID_CONFIG.replace("300", "600"));
        assert_ne!(
            compute_config_hash(a.path()).unwrap(),
            compute_config_hash(b.path()).unwrap()
        );
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config(VALID_CONFIG);
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.archive.base_url, "https://arxiv.org");
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }
}
