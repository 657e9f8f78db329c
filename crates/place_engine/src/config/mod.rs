//! Configuration system

use std::path::Path;
use std::time::Duration;

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match extension(path) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("ron") => Self::from_ron_str(&contents),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Parse configuration from a TOML document
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse configuration from a RON document
    fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of its valid range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tuning for the spatial hash and the query engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceConfig {
    /// Cell width of both spatial hashes, in world units
    pub grid_x: f32,

    /// Cell height of both spatial hashes, in world units
    pub grid_y: f32,

    /// Period of the steering multiplier flip used by `go`
    pub flip_period_ms: u64,

    /// Step size used by stepped movement when the caller passes none
    pub default_precision: f32,

    /// Most steps a single movement call takes; longer moves use coarser steps
    pub max_move_steps: u32,

    /// Polygon resolution for circles stretched into ellipses
    pub ellipse_segments: usize,

    /// Angular increment of the obstacle avoidance search
    pub avoidance_step_deg: f32,

    /// Largest deviation from the bearing the avoidance search tries
    pub avoidance_max_deg: f32,
}

impl Default for PlaceConfig {
    fn default() -> Self {
        Self {
            grid_x: 512.0,
            grid_y: 512.0,
            flip_period_ms: 789,
            default_precision: 1.0,
            max_move_steps: 65_536,
            ellipse_segments: 16,
            avoidance_step_deg: 30.0,
            avoidance_max_deg: 120.0,
        }
    }
}

impl Config for PlaceConfig {}

impl PlaceConfig {
    /// Create a config with the given cell size and defaults elsewhere
    pub fn with_grid(grid_x: f32, grid_y: f32) -> Self {
        Self {
            grid_x,
            grid_y,
            ..Self::default()
        }
    }

    /// Period of the steering multiplier flip
    pub fn flip_period(&self) -> Duration {
        Duration::from_millis(self.flip_period_ms)
    }

    /// Check that every value is usable by the engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_x > 0.0 && self.grid_y > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "grid size must be positive, got {}x{}",
                self.grid_x, self.grid_y
            )));
        }
        if !(self.default_precision > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "default precision must be positive, got {}",
                self.default_precision
            )));
        }
        if self.max_move_steps == 0 {
            return Err(ConfigError::Invalid("movement step limit must be non-zero".to_string()));
        }
        if self.flip_period_ms == 0 {
            return Err(ConfigError::Invalid("flip period must be non-zero".to_string()));
        }
        if self.ellipse_segments < 3 {
            return Err(ConfigError::Invalid(format!(
                "ellipse needs at least 3 segments, got {}",
                self.ellipse_segments
            )));
        }
        if !(self.avoidance_step_deg > 0.0) || self.avoidance_max_deg < self.avoidance_step_deg {
            return Err(ConfigError::Invalid(format!(
                "avoidance search {}..={} degrees is empty",
                self.avoidance_step_deg, self.avoidance_max_deg
            )));
        }
        Ok(())
    }

    /// Deviation angles tried by the avoidance search, smallest first
    pub fn avoidance_angles(&self) -> Vec<f32> {
        let mut angles = Vec::new();
        let mut angle = self.avoidance_step_deg;
        while angle <= self.avoidance_max_deg + f32::EPSILON {
            angles.push(angle);
            angle += self.avoidance_step_deg;
        }
        angles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlaceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.avoidance_angles(), vec![30.0, 60.0, 90.0, 120.0]);
        assert_eq!(config.flip_period(), Duration::from_millis(789));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = PlaceConfig::from_toml_str("grid_x = 64.0\ngrid_y = 32.0\n").unwrap();
        assert_eq!(config.grid_x, 64.0);
        assert_eq!(config.grid_y, 32.0);
        assert_eq!(config.ellipse_segments, 16);
    }

    #[test]
    fn test_ron_parse() {
        let config = PlaceConfig::from_ron_str("(grid_x: 128.0, flip_period_ms: 500)").unwrap();
        assert_eq!(config.grid_x, 128.0);
        assert_eq!(config.grid_y, 512.0);
        assert_eq!(config.flip_period_ms, 500);
    }

    #[test]
    fn test_validate_rejects_bad_grid() {
        let config = PlaceConfig::with_grid(0.0, 16.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_zero_step_limit() {
        let config = PlaceConfig { max_move_steps: 0, ..PlaceConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!("place_config_{}.toml", std::process::id()));
        let config = PlaceConfig::with_grid(96.0, 48.0);
        config.save_to_file(&path).unwrap();
        let loaded = PlaceConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = PlaceConfig::default().save_to_file("config.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
