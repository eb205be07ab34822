//! Material system for meshes

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

use super::texture::Texture;

/// Material properties as laid out for the fragment shader
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MaterialUniform {
    /// Base color (RGBA, linear)
    pub base_color: [f32; 4],
    /// Perceptual roughness (0.0 - 1.0), multiplied by the roughness map
    pub roughness: f32,
    /// Strength of the normal map (0.0 disables it)
    pub normal_scale: f32,
    /// Strength of the ambient occlusion map
    pub ao_strength: f32,
    /// Padding for alignment
    _padding: f32,
}

impl Default for MaterialUniform {
    fn default() -> Self {
        Material::default().to_uniform()
    }
}

/// Material definition
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color, multiplied with the base color map
    pub base_color: Vec4,
    /// Perceptual roughness (0.0 - 1.0)
    pub roughness: f32,
    /// Strength of the normal map
    pub normal_scale: f32,
    /// Strength of the ambient occlusion map
    pub ao_strength: f32,
}

impl Material {
    /// Create a new material with a color
    pub fn new(color: Vec3) -> Self {
        Self {
            base_color: color.extend(1.0),
            roughness: 1.0,
            normal_scale: 0.0,
            ao_strength: 0.0,
        }
    }

    /// Set roughness
    #[must_use]
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Material that takes everything from its texture maps
    pub fn textured() -> Self {
        Self {
            base_color: Vec4::ONE,
            roughness: 1.0,
            normal_scale: 1.0,
            ao_strength: 1.0,
        }
    }

    /// Convert to uniform data
    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color.into(),
            roughness: self.roughness,
            normal_scale: self.normal_scale,
            ao_strength: self.ao_strength,
            _padding: 0.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec3::new(0.8, 0.8, 0.8))
    }
}

/// Optional texture maps of a material; missing maps use neutral defaults
#[derive(Debug, Default)]
pub struct MaterialMaps {
    /// sRGB base color
    pub base_color: Option<Texture>,
    /// Linear roughness in the green channel
    pub roughness: Option<Texture>,
    /// Tangent-space normal map
    pub normal: Option<Texture>,
    /// Linear ambient occlusion in the red channel
    pub ambient_occlusion: Option<Texture>,
}

/// A material uploaded to the GPU
#[derive(Debug)]
pub struct GpuMaterial {
    pub(crate) bind_group: wgpu::BindGroup,
}
