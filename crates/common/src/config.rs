//! YAML configuration for the demo binaries.
//!
//! ```yaml
//! window:
//!   width: 800
//!   height: 600
//! camera:
//!   position: [0.0, 0.0, 3.0]
//!   movement_speed: 2.5
//! assets:
//!   shader_dir: assets/shaders
//! ```
//!
//! Any section or field may be omitted.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub assets: AssetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "LearnOpenGL".into(),
        }
    }
}

/// Initial camera state and tuning. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub world_up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub pitch_limit: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            zoom: 45.0,
            zoom_min: 1.0,
            zoom_max: 45.0,
            pitch_limit: 89.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            self.yaw,
            self.pitch,
            self.zoom,
            self.movement_speed,
            self.mouse_sensitivity,
        ];
        if !(self.position.is_finite()
            && self.world_up.is_finite()
            && scalars.iter().all(|v| v.is_finite()))
        {
            return Err(ConfigError::Invalid(
                "camera position, angles, zoom and speeds must be finite".into(),
            ));
        }
        if !(self.zoom_min > 0.0 && self.zoom_min <= self.zoom_max && self.zoom_max < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera zoom range [{}, {}] must satisfy 0 < min <= max < 180",
                self.zoom_min, self.zoom_max
            )));
        }
        if !(self.pitch_limit > 0.0 && self.pitch_limit < 90.0) {
            return Err(ConfigError::Invalid(format!(
                "camera pitch_limit {} must be in (0, 90)",
                self.pitch_limit
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ConfigError::Invalid(format!(
                "camera clip planes near={} far={} must satisfy 0 < near < far",
                self.near, self.far
            )));
        }
        if self.world_up.length_squared() == 0.0 {
            return Err(ConfigError::Invalid("camera world_up must be non-zero".into()));
        }
        Ok(())
    }
}

/// Where shaders and textures are looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub shader_dir: PathBuf,
    pub texture_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            shader_dir: PathBuf::from("assets/shaders"),
            texture_dir: PathBuf::from("assets/textures"),
        }
    }
}

impl AssetConfig {
    pub fn shader(&self, file_name: &str) -> PathBuf {
        self.shader_dir.join(file_name)
    }

    pub fn texture(&self, file_name: &str) -> PathBuf {
        self.texture_dir.join(file_name)
    }
}

impl AppConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        let config: AppConfig = if text.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.camera.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!("no configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_tutorial_values() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(config.camera.yaw, -90.0);
        assert_eq!(config.camera.zoom_max, 45.0);
        assert!(config.camera.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = AppConfig::from_yaml_str(
            "camera:\n  movement_speed: 5.0\n  position: [1.0, 2.0, 3.0]\n",
        )
        .unwrap();
        assert_eq!(config.camera.movement_speed, 5.0);
        assert_eq!(config.camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.camera.mouse_sensitivity, 0.1);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn empty_document_is_default() {
        let config = AppConfig::from_yaml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn inverted_zoom_range_is_rejected() {
        let err = AppConfig::from_yaml_str("camera:\n  zoom_min: 50.0\n  zoom_max: 10.0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn pitch_limit_at_pole_is_rejected() {
        let err = AppConfig::from_yaml_str("camera:\n  pitch_limit: 90.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn non_finite_camera_values_are_rejected() {
        let config = CameraConfig {
            zoom: f32::NAN,
            ..CameraConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = CameraConfig {
            position: Vec3::new(0.0, f32::INFINITY, 0.0),
            ..CameraConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = AppConfig::from_yaml_str("window: [not, a, map").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "window:\n  title: Chapter 12").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.window.title, "Chapter 12");
    }

    #[test]
    fn missing_file_is_io_error_but_default_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Io { .. })
        ));
        assert_eq!(AppConfig::load_or_default(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn asset_paths_join_directories() {
        let assets = AssetConfig::default();
        assert_eq!(
            assets.shader("cube.vert"),
            PathBuf::from("assets/shaders/cube.vert")
        );
    }
}
