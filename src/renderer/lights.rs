//! Scene lighting: one shadow-casting directional light plus ambient

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::core::LightingSettings;

/// GPU-compatible light data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightUniform {
    /// Unit vector from the scene towards the light
    pub to_light: [f32; 3],
    _padding1: f32,
    /// Light color premultiplied by intensity
    pub radiance: [f32; 3],
    _padding2: f32,
    /// Ambient color premultiplied by intensity
    pub ambient: [f32; 3],
    _padding3: f32,
}

/// Directional light (like the sun), aimed from `position` at `target`
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub target: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Create a new directional light
    #[must_use]
    pub fn new(position: Vec3, target: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            position,
            target,
            color,
            intensity,
        }
    }

    /// Direction the light travels in
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Y)
    }
}

/// Uniform light reaching every surface
#[derive(Debug, Clone)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

/// All lights of the scene
#[derive(Debug, Clone)]
pub struct SceneLights {
    pub directional: DirectionalLight,
    pub ambient: AmbientLight,
}

impl SceneLights {
    /// Build lights from demo settings
    #[must_use]
    pub fn from_settings(settings: &LightingSettings) -> Self {
        Self {
            directional: DirectionalLight::new(
                settings.directional_position,
                settings.directional_target,
                settings.directional_color,
                settings.directional_intensity,
            ),
            ambient: AmbientLight {
                color: settings.ambient_color,
                intensity: settings.ambient_intensity,
            },
        }
    }

    /// Convert to uniform data
    #[must_use]
    pub fn to_uniform(&self) -> LightUniform {
        LightUniform {
            to_light: (-self.directional.direction()).into(),
            _padding1: 0.0,
            radiance: (self.directional.color * self.directional.intensity).into(),
            _padding2: 0.0,
            ambient: (self.ambient.color * self.ambient.intensity).into(),
            _padding3: 0.0,
        }
    }
}

impl Default for SceneLights {
    fn default() -> Self {
        Self::from_settings(&LightingSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lights() {
        let lights = SceneLights::default();
        let uniform = lights.to_uniform();

        let expected = Vec3::new(0.0, 4.0, 3.0).normalize();
        assert!((Vec3::from_array(uniform.to_light) - expected).length() < 1e-6);
        assert_eq!(uniform.radiance, [5.0, 5.0, 5.0]);
        assert_eq!(uniform.ambient, [5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_degenerate_light_points_down() {
        let light = DirectionalLight::new(Vec3::ONE, Vec3::ONE, Vec3::ONE, 1.0);
        assert_eq!(light.direction(), Vec3::NEG_Y);
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);
    }
}
