//! Shadow mapping system
//!
//! Implements shadow mapping for the directional light with a depth-only pass.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::lights::DirectionalLight;
use crate::core::LightingSettings;

/// Shadow map configuration
#[derive(Debug, Clone)]
pub struct ShadowConfig {
    /// Shadow map resolution (width and height)
    pub resolution: u32,
    /// Near plane for shadow camera
    pub near: f32,
    /// Far plane for shadow camera
    pub far: f32,
    /// Half size of the orthographic shadow frustum
    pub extent: f32,
    /// Shadow bias to prevent shadow acne
    pub bias: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self::from_settings(&LightingSettings::default())
    }
}

impl ShadowConfig {
    /// Shadow parameters from demo settings
    #[must_use]
    pub fn from_settings(settings: &LightingSettings) -> Self {
        Self {
            resolution: settings.shadow_resolution.max(1),
            near: settings.shadow_near,
            far: settings.shadow_far,
            extent: settings.shadow_extent,
            bias: 0.002,
        }
    }

    /// View-projection of the light's shadow camera
    #[must_use]
    pub fn light_space_matrix(&self, light: &DirectionalLight) -> Mat4 {
        let direction = light.direction();
        let up = if direction.dot(Vec3::Y).abs() > 0.999 {
            Vec3::Z
        } else {
            Vec3::Y
        };

        let view = Mat4::look_at_rh(light.position, light.position + direction, up);
        let projection = Mat4::orthographic_rh(
            -self.extent,
            self.extent,
            -self.extent,
            self.extent,
            self.near,
            self.far,
        );
        projection * view
    }
}

/// Shadow uniform data for shader
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowUniform {
    /// Light space matrix
    pub light_space_matrix: [[f32; 4]; 4],
    /// Shadow bias
    pub bias: f32,
    /// Size of one shadow map texel in UV units
    pub texel_size: f32,
    _padding: [f32; 2],
}

impl ShadowUniform {
    fn new(matrix: Mat4, config: &ShadowConfig) -> Self {
        Self {
            light_space_matrix: matrix.to_cols_array_2d(),
            bias: config.bias,
            texel_size: 1.0 / config.resolution as f32,
            _padding: [0.0; 2],
        }
    }
}

/// Shadow map for the directional light
pub struct ShadowMap {
    /// Depth texture for shadow map
    pub texture: wgpu::Texture,
    /// Texture view for rendering
    pub depth_view: wgpu::TextureView,
    /// Sampler for shadow sampling
    pub sampler: wgpu::Sampler,
    /// Light space matrix (view-projection from light's perspective)
    pub light_space_matrix: Mat4,
    /// Configuration
    pub config: ShadowConfig,
    /// Uniform buffer for shadow data
    pub uniform_buffer: wgpu::Buffer,
}

impl ShadowMap {
    /// Create a new shadow map
    #[must_use]
    pub fn new(device: &wgpu::Device, config: ShadowConfig) -> Self {
        let size = wgpu::Extent3d {
            width: config.resolution,
            height: config.resolution,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_map_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let depth_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let uniform = ShadowUniform::new(Mat4::IDENTITY, &config);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shadow_uniform_buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            texture,
            depth_view,
            sampler,
            light_space_matrix: Mat4::IDENTITY,
            config,
            uniform_buffer,
        }
    }

    /// Aim the shadow camera along a directional light
    pub fn update_for_light(&mut self, queue: &wgpu::Queue, light: &DirectionalLight) {
        self.light_space_matrix = self.config.light_space_matrix(light);

        let uniform = ShadowUniform::new(self.light_space_matrix, &self.config);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Bind group layout used while rendering into the shadow map
    pub fn pass_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_pass_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    /// Bind group used while rendering into the shadow map
    pub fn create_pass_bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_pass_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: self.uniform_buffer.as_entire_binding(),
            }],
        })
    }

    /// Get bind group layout for shadow map sampling
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_bind_group_layout"),
            entries: &[
                // Shadow map texture
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Shadow sampler (comparison sampler)
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
                // Shadow uniform (light space matrix, bias)
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        })
    }

    /// Create bind group for shadow sampling
    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Get the resolution
    #[must_use]
    pub const fn resolution(&self) -> u32 {
        self.config.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::SceneLights;

    #[test]
    fn test_target_projects_to_center() {
        let config = ShadowConfig::default();
        let lights = SceneLights::default();
        let matrix = config.light_space_matrix(&lights.directional);

        let clip = matrix.project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        // The target sits 5 units away, inside [near, far] = [1, 6]
        assert!((clip.z - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_points_outside_far_plane_are_clipped() {
        let config = ShadowConfig::default();
        let lights = SceneLights::default();
        let matrix = config.light_space_matrix(&lights.directional);

        let beyond = lights.directional.position + lights.directional.direction() * 7.0;
        assert!(matrix.project_point3(beyond).z > 1.0);
    }

    #[test]
    fn test_straight_down_light_is_valid() {
        let config = ShadowConfig::default();
        let light = DirectionalLight::new(Vec3::new(0.0, 4.0, 0.0), Vec3::ZERO, Vec3::ONE, 1.0);
        let matrix = config.light_space_matrix(&light);
        assert!(matrix.is_finite());
    }

    #[test]
    fn test_config_from_settings() {
        let config = ShadowConfig::default();
        assert_eq!(config.resolution, 1024);
        assert_eq!(config.near, 1.0);
        assert_eq!(config.far, 6.0);
    }
}
