use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum number of entries kept in the recent-projects list
pub const MAX_RECENT: usize = 6;

/// Configuration for interview-manager
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for interview-manager data
    pub base_dir: PathBuf,
    /// Path to the settings document
    pub settings_path: PathBuf,
    /// Log file used while the terminal browser owns stderr
    pub log_path: PathBuf,
}

impl Config {
    /// Get the default configuration directory
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
            .map(|dir| dir.join("interview-manager"))
    }

    /// Create a new configuration
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.unwrap_or_else(|| {
            Self::default_base_dir().unwrap_or_else(|_| PathBuf::from(".interview-manager"))
        });

        Ok(Self {
            settings_path: base_dir.join("settings.json"),
            log_path: base_dir.join("interview-manager.log"),
            base_dir,
        })
    }

    /// Create the configuration directory
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}

/// User settings persisted as JSON next to the config.
///
/// Key names match the files written by earlier releases (`recent`, `revKey`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub recent: Vec<String>,
    #[serde(default, rename = "revKey")]
    pub api_key: String,
}

impl Settings {
    /// Load settings, creating the file with defaults when it does not exist yet
    pub fn load_or_init(config: &Config) -> Result<Self> {
        if config.settings_path.exists() {
            let content = std::fs::read_to_string(&config.settings_path)?;
            let settings = serde_json::from_str(&content).map_err(|e| {
                Error::Config(format!(
                    "Failed to parse {}: {}",
                    config.settings_path.display(),
                    e
                ))
            })?;
            debug!(path = %config.settings_path.display(), "loaded settings");
            return Ok(settings);
        }

        config.init()?;
        let settings = Self::default();
        settings.save(config)?;
        debug!(path = %config.settings_path.display(), "created settings");
        Ok(settings)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = config.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&config.settings_path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Move `dir` to the front of the recent list, dropping duplicates and
    /// anything past [`MAX_RECENT`]
    pub fn push_recent(&mut self, dir: &Path) {
        let dir = dir.display().to_string();
        if dir.is_empty() {
            return;
        }
        self.recent.retain(|d| d != &dir);
        self.recent.insert(0, dir);
        self.recent.truncate(MAX_RECENT);
    }

    pub fn clear_recent(&mut self) {
        self.recent.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_or_init_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(Some(temp_dir.path().join("cfg"))).unwrap();
        assert!(!config.settings_path.exists());

        let settings = Settings::load_or_init(&config).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(config.settings_path.exists());
    }

    #[test]
    fn test_reads_legacy_key_names() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(Some(temp_dir.path().to_path_buf())).unwrap();
        std::fs::write(
            &config.settings_path,
            r#"{"recent":["/home/me/story"],"revKey":"abc"}"#,
        )
        .unwrap();

        let settings = Settings::load_or_init(&config).unwrap();
        assert_eq!(settings.api_key, "abc");
        assert_eq!(settings.recent, vec!["/home/me/story".to_string()]);
    }

    #[test]
    fn test_missing_keys_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(Some(temp_dir.path().to_path_buf())).unwrap();
        std::fs::write(&config.settings_path, "{}").unwrap();

        let settings = Settings::load_or_init(&config).unwrap();
        assert!(settings.recent.is_empty());
        assert!(settings.api_key.is_empty());
    }

    #[test]
    fn test_push_recent_dedupes_and_caps() {
        let mut settings = Settings::default();
        for i in 0..8 {
            settings.push_recent(Path::new(&format!("/p/{}", i)));
        }
        settings.push_recent(Path::new("/p/5"));

        assert_eq!(settings.recent.len(), MAX_RECENT);
        assert_eq!(settings.recent[0], "/p/5");
        assert_eq!(settings.recent[1], "/p/7");
        assert_eq!(settings.recent.iter().filter(|d| *d == "/p/5").count(), 1);
    }

    #[test]
    fn test_save_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(Some(temp_dir.path().join("nested"))).unwrap();
        let mut settings = Settings::default();
        settings.api_key = "key".to_string();
        settings.push_recent(Path::new("/a"));
        settings.save(&config).unwrap();

        let loaded = Settings::load_or_init(&config).unwrap();
        assert_eq!(loaded, settings);
    }
}
