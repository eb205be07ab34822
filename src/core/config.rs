//! Demo settings
//!
//! Every literal of the table tennis scene lives here. The defaults are the
//! values the scene was tuned with; a RON or JSON file can override any of
//! them.

use std::fs;
use std::path::{Path, PathBuf};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Top-level settings tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowSettings,
    pub assets: AssetSettings,
    pub physics: PhysicsSettings,
    pub bodies: BodySettings,
    pub camera: CameraSettings,
    pub lighting: LightingSettings,
}

/// Window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: String::from("Table Tennis"),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

/// Asset locations, relative to `root`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub root: PathBuf,
    pub table_model: PathBuf,
    pub bat_model: PathBuf,
    pub ball_base_color: PathBuf,
    pub ball_roughness: PathBuf,
    pub ball_normal: PathBuf,
    pub ball_ambient_occlusion: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("static"),
            table_model: PathBuf::from("models/table_tennis_table.glb"),
            bat_model: PathBuf::from("models/bat/scene.gltf"),
            ball_base_color: PathBuf::from("textures/plastic/Plastic_004_basecolor.jpg"),
            ball_roughness: PathBuf::from("textures/plastic/Plastic_004_roughness.jpg"),
            ball_normal: PathBuf::from("textures/plastic/Plastic_004_normal.jpg"),
            ball_ambient_occlusion: PathBuf::from(
                "textures/plastic/Plastic_004_ambientOcclusion.jpg",
            ),
        }
    }
}

impl AssetSettings {
    /// Resolve an asset path against the asset root
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}

/// World-wide simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: Vec3,
    /// Fixed integration step in seconds
    pub fixed_timestep: f32,
    /// Upper bound on fixed steps run for one frame
    pub max_substeps: u32,
    /// Friction between plywood and plastic
    pub plywood_plastic_friction: f32,
    /// Restitution between plywood and plastic
    pub plywood_plastic_restitution: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 3,
            plywood_plastic_friction: 0.1,
            plywood_plastic_restitution: 0.7,
        }
    }
}

/// Body geometry and placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySettings {
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub ball_spawn: Vec3,
    pub bat_half_extents: Vec3,
    pub bat_position: Vec3,
    /// Uniform scale applied to the bat model
    pub bat_model_scale: f32,
    /// Rotation of the bat model around Y, in radians
    pub bat_model_yaw: f32,
    pub table_half_extents: Vec3,
    pub table_position: Vec3,
    /// Rotation axis for the table box
    pub table_axis: Vec3,
    /// Rotation angle for the table box, in radians
    pub table_angle: f32,
    pub net_half_extents: Vec3,
    pub net_position: Vec3,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            ball_radius: 0.1,
            ball_mass: 1.0,
            ball_spawn: Vec3::new(-0.75, 3.0, 1.6),
            bat_half_extents: Vec3::splat(0.24),
            bat_position: Vec3::new(0.6, 1.5, 1.5),
            bat_model_scale: 0.24,
            bat_model_yaw: -std::f32::consts::FRAC_PI_2,
            table_half_extents: Vec3::new(1.6, 2.7, 0.01),
            table_position: Vec3::new(0.0, 1.5, 0.0),
            table_axis: Vec3::NEG_X,
            table_angle: std::f32::consts::FRAC_PI_2,
            net_half_extents: Vec3::new(1.8, 0.1, 0.05),
            net_position: Vec3::new(0.0, 1.65, 0.0),
        }
    }
}

impl BodySettings {
    /// Orientation of the table box; identity for a degenerate axis
    pub fn table_rotation(&self) -> Quat {
        self.table_axis
            .try_normalize()
            .map_or(Quat::IDENTITY, |axis| Quat::from_axis_angle(axis, self.table_angle))
    }

    /// Orientation of the bat model
    pub fn bat_model_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.bat_model_yaw)
    }
}

/// Perspective camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub direction: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 70.0,
            near: 1.0,
            far: 100.0,
            position: Vec3::new(0.0, 2.0, 4.0),
            direction: Vec3::NEG_Z,
        }
    }
}

/// Lights and shadows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    pub directional_position: Vec3,
    pub directional_target: Vec3,
    pub directional_color: Vec3,
    pub directional_intensity: f32,
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub shadow_resolution: u32,
    pub shadow_near: f32,
    pub shadow_far: f32,
    /// Half extent of the orthographic shadow frustum
    pub shadow_extent: f32,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            directional_position: Vec3::new(0.0, 4.0, 3.0),
            directional_target: Vec3::ZERO,
            directional_color: Vec3::ONE,
            directional_intensity: 5.0,
            ambient_color: Vec3::ONE,
            ambient_intensity: 5.0,
            shadow_resolution: 1024,
            shadow_near: 1.0,
            shadow_far: 6.0,
            shadow_extent: 5.0,
        }
    }
}

impl DemoConfig {
    /// Load settings from a `.ron` or `.json` file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// or does not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::from_ron_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Parse settings from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse settings from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Render settings as pretty RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Save settings to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = self.to_ron_string()?;
        fs::write(path, text).map_err(|e| ConfigError::IoError(e.to_string()))
    }
}

/// Errors that can occur while loading settings
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error reading or writing file
    IoError(String),
    /// File extension is neither `ron` nor `json`
    UnsupportedFormat(String),
    /// Text did not parse
    ParseError(String),
    /// Settings could not be serialized
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::UnsupportedFormat(ext) => write!(f, "Unsupported config format: '{ext}'"),
            Self::ParseError(e) => write!(f, "Parse error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scene_constants() {
        let config = DemoConfig::default();
        assert_eq!(config.physics.gravity, Vec3::new(0.0, -9.82, 0.0));
        assert_eq!(config.physics.max_substeps, 3);
        assert_eq!(config.bodies.ball_radius, 0.1);
        assert_eq!(config.bodies.ball_spawn, Vec3::new(-0.75, 3.0, 1.6));
        assert_eq!(config.bodies.net_position, Vec3::new(0.0, 1.65, 0.0));
        assert_eq!(config.camera.fov_degrees, 70.0);
        assert_eq!(config.lighting.shadow_resolution, 1024);
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = DemoConfig::default();
        config.window.title = "Practice".to_string();
        config.physics.plywood_plastic_restitution = 0.9;

        let text = config.to_ron_string().unwrap();
        assert!(text.contains("Practice"));

        let loaded = DemoConfig::from_ron_str(&text).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_ron_then_load() {
        let mut config = DemoConfig::default();
        config.bodies.ball_spawn = Vec3::new(0.5, 2.5, -1.0);
        config.window.vsync = false;

        let path = std::env::temp_dir().join(format!(
            "table_tennis_config_{}.ron",
            std::process::id()
        ));
        config.save_ron(&path).unwrap();
        let loaded = DemoConfig::load(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let loaded =
            DemoConfig::from_json_str(r#"{ "physics": { "max_substeps": 5 } }"#).unwrap();
        assert_eq!(loaded.physics.max_substeps, 5);
        assert_eq!(loaded.physics.fixed_timestep, 1.0 / 60.0);
        assert_eq!(loaded.bodies, BodySettings::default());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let path = std::env::temp_dir().join("table_tennis_config_test.toml");
        fs::write(&path, "").unwrap();
        let result = DemoConfig::load(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = DemoConfig::load("does/not/exist.ron");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_table_rotation_lays_box_flat() {
        let bodies = BodySettings::default();
        let up = bodies.table_rotation() * Vec3::Z;
        assert!((up - Vec3::Y).length() < 1e-6);

        let degenerate = BodySettings {
            table_axis: Vec3::ZERO,
            ..BodySettings::default()
        };
        assert_eq!(degenerate.table_rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_asset_resolve() {
        let assets = AssetSettings::default();
        assert_eq!(
            assets.resolve(&assets.table_model),
            PathBuf::from("static/models/table_tennis_table.glb")
        );
    }
}
