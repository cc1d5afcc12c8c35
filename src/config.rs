use std::path::PathBuf;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use dirs;

/// Deployment-supplied blocked-format rule.
///
/// Lets a deployment block additional extensions without a code change. The
/// built-in legacy Office table takes precedence over these rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedFormatRule {
    /// Extension without the leading dot (matched case-insensitively)
    pub extension: String,
    /// User-facing message returned with the rejection
    pub message: String,
    /// Status code for the rejection; defaults to 400 when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Configuration structure for the gate service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Staging directories the scan operation may inspect
    pub staging_directories: Vec<String>,
    /// Currently active staging directory
    pub active_directory: Option<String>,
    /// Extra blocked-format rules, consulted after the built-in table
    #[serde(default)]
    pub extra_blocked: Vec<BlockedFormatRule>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            staging_directories: Vec::new(),
            active_directory: None,
            extra_blocked: Vec::new(),
        }
    }
}

/// Get the platform-specific configuration file path
///
/// # Returns
/// * Unix/macOS: `~/.config/upload-gate/config.json`
/// * Windows: `%APPDATA%\upload-gate\config.json`
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to get config directory"))?;

    let mut config_path = config_dir;
    config_path.push("upload-gate");
    config_path.push("config.json");

    Ok(config_path)
}

/// Load configuration from file, creating default if missing
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - Error if file exists but cannot be read/parsed
pub fn load_config() -> Result<Config> {
    let config_path = get_config_path()?;

    // If config file doesn't exist, return default
    if !config_path.exists() {
        return Ok(Config::default());
    }

    // Read and parse config file
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    Ok(config)
}

/// Save configuration to file
///
/// # Arguments
/// * `config` - Configuration to save
///
/// # Returns
/// * `Ok(())` - Success
/// * `Err` - Error if file cannot be written
pub fn save_config(config: &Config) -> Result<()> {
    let config_path = get_config_path()?;

    // Create parent directories if they don't exist
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    // Serialize and write config
    let content = serde_json::to_string_pretty(config)
        .context("Failed to serialize config")?;

    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.staging_directories.is_empty());
        assert!(config.active_directory.is_none());
        assert!(config.extra_blocked.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.staging_directories.push("/test/path".to_string());
        config.active_directory = Some("/test/path".to_string());
        config.extra_blocked.push(BlockedFormatRule {
            extension: "xls".to_string(),
            message: "Les fichiers .xls ne sont pas pris en charge.".to_string(),
            status_code: None,
        });

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.staging_directories.len(), 1);
        assert_eq!(deserialized.staging_directories[0], "/test/path");
        assert_eq!(deserialized.active_directory, Some("/test/path".to_string()));
        assert_eq!(deserialized.extra_blocked.len(), 1);
        assert_eq!(deserialized.extra_blocked[0].extension, "xls");
        assert_eq!(deserialized.extra_blocked[0].status_code, None);
    }

    #[test]
    fn test_config_without_extra_blocked_parses() {
        // Config files written before extra_blocked existed omit the field
        let json = r#"{"staging_directories":["/uploads"],"active_directory":null}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.staging_directories, vec!["/uploads".to_string()]);
        assert!(config.extra_blocked.is_empty());
    }
}
