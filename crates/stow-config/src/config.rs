//! Configuration types and layered loading

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stow_foundation::{StowError, StowResult};

/// Config files looked up relative to the project directory, first found wins
pub const CONFIG_FILES: [&str; 2] = ["stow.toml", ".stow/config.toml"];

/// Prefix of environment overrides, e.g. `STOW__PLACEMENT__INDENT_WIDTH=2`
pub const ENV_PREFIX: &str = "STOW__";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON lines
    Json,
    /// Human-readable output
    Pretty,
}

/// Settings used when new declarations are written into destination files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Blank lines separating an appended declaration from existing content
    pub blank_lines_before_declaration: usize,
    /// Spaces per indentation level in synthesized class bodies
    pub indent_width: usize,
    /// Initial content of package markers created on the way down a chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_content: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            blank_lines_before_declaration: 2,
            indent_width: 4,
            marker_content: None,
        }
    }
}

impl PlacementConfig {
    /// Separator inserted between existing content and an appended declaration
    pub fn separator(&self) -> String {
        "\n".repeat(self.blank_lines_before_declaration)
    }

    pub fn indent(&self) -> String {
        " ".repeat(self.indent_width)
    }
}

impl AppConfig {
    /// Load configuration for the current directory.
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables (`STOW__*`)
    /// 2. `stow.toml` or `.stow/config.toml`
    /// 3. Default values
    pub fn load() -> StowResult<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration, looking for config files under `project_dir`
    pub fn load_from(project_dir: &Path) -> StowResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if let Some(path) = Self::find_config_file(project_dir) {
            tracing::info!(path = %path.display(), "Loading TOML configuration");
            figment = figment.merge(Toml::file(path));
        }

        let config: AppConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| StowError::config(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;

        tracing::debug!(
            level = %config.logging.level,
            blank_lines = config.placement.blank_lines_before_declaration,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    fn find_config_file(project_dir: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| project_dir.join(name))
            .find(|path| path.is_file())
    }

    /// Save configuration as TOML
    pub fn save(&self, path: &Path) -> StowResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StowError::io_at(parent, e))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| StowError::config(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, content).map_err(|e| StowError::io_at(path, e))
    }

    /// Validate the configuration
    pub fn validate(&self) -> StowResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(StowError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        if self.placement.indent_width == 0 {
            return Err(StowError::config("Indent width cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.placement.blank_lines_before_declaration, 2);
        assert_eq!(config.placement.separator(), "\n\n");
        assert_eq!(config.placement.indent(), "    ");
        assert!(config.placement.marker_content.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_without_files_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_from_toml_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("stow.toml"),
            "[placement]\nblank_lines_before_declaration = 1\nmarker_content = \"# package\\n\"\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.placement.blank_lines_before_declaration, 1);
        assert_eq!(config.placement.indent_width, 4);
        assert_eq!(config.placement.marker_content.as_deref(), Some("# package\n"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".stow")).unwrap();
        std::fs::write(
            dir.path().join(".stow/config.toml"),
            "[placement]\nindent_width = 8\n",
        )
        .unwrap();

        std::env::set_var("STOW__PLACEMENT__INDENT_WIDTH", "2");
        let result = AppConfig::load_from(dir.path());
        std::env::remove_var("STOW__PLACEMENT__INDENT_WIDTH");

        assert_eq!(result.unwrap().placement.indent_width, 2);
    }

    #[test]
    #[serial]
    fn test_invalid_log_level_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("stow.toml"), "[logging]\nlevel = \"loud\"\n").unwrap();

        let err = AppConfig::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, StowError::Config { .. }));
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_zero_indent_is_rejected() {
        let mut config = AppConfig::default();
        config.placement.indent_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_saved_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.placement.blank_lines_before_declaration = 3;
        config.save(&dir.path().join("stow.toml")).unwrap();

        let loaded = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }
}
