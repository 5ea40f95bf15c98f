//! Scene graph configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `config/default.toml` (version controlled)
//! 3. `config/user.toml` (gitignored, user overrides)
//! 4. Environment variables (`SG_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use scenegraph_core::{ActorId, LogObserver, Scene, DEFAULT_ROOT_ID, DEFAULT_ROOT_NAME};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "SG_";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneGraphConfig {
    /// Scene construction settings
    #[serde(default)]
    pub scene: SceneSettings,
    /// Debug and logging settings
    #[serde(default)]
    pub debug: DebugConfig,
}

impl SceneGraphConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    ///
    /// Missing files are skipped; built-in defaults fill any gaps.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // SG_SCENE__ROOT_NAME=World -> scene.root_name = "World"
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Scene construction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Name of the root node
    pub root_name: String,
    /// Actor id of the root node
    pub root_id: ActorId,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            root_id: DEFAULT_ROOT_ID,
        }
    }
}

impl SceneSettings {
    /// Build an empty scene with the configured root identity
    pub fn create_scene(&self) -> Scene {
        Scene::with_root(self.root_name.clone(), self.root_id)
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (error, warn, info, debug, trace, or env_logger directives)
    pub log_level: String,
    /// Trace every node update, not just draws
    pub log_updates: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_updates: false,
        }
    }
}

impl DebugConfig {
    /// Observer that reports traversal at the configured verbosity
    pub fn observer(&self) -> LogObserver {
        LogObserver::new(self.log_updates)
    }

    /// Install env_logger with the configured filter
    ///
    /// Fails if a logger is already installed.
    pub fn init_logger(&self) -> Result<(), log::SetLoggerError> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .try_init()
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = SceneGraphConfig::default();
        assert_eq!(config.scene.root_name, "Root");
        assert_eq!(config.scene.root_id, 1);
        assert_eq!(config.debug.log_level, "info");
        assert!(!config.debug.log_updates);
    }

    #[test]
    fn test_config_serialization() {
        let config = SceneGraphConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("root_name"));
        assert!(toml.contains("log_level"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SceneGraphConfig = toml::from_str("[scene]\nroot_id = 10\n").unwrap();
        assert_eq!(config.scene.root_id, 10);
        assert_eq!(config.scene.root_name, "Root");
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    #[serial]
    fn test_missing_directory_uses_defaults() {
        let config = SceneGraphConfig::load_from("does/not/exist").unwrap();
        assert_eq!(config.scene.root_id, DEFAULT_ROOT_ID);
    }

    #[test]
    fn test_create_scene_uses_root_identity() {
        let settings = SceneSettings {
            root_name: "World".to_string(),
            root_id: 100,
        };
        let scene = settings.create_scene();
        let root = scene.node(scene.root()).unwrap();
        assert_eq!(root.name(), "World");
        assert_eq!(root.id(), 100);
    }

    #[test]
    fn test_observer_follows_debug_config() {
        let debug = DebugConfig {
            log_level: "debug".to_string(),
            log_updates: true,
        };
        assert!(debug.observer().log_updates);
    }
}
