//! Drawable mesh instances

use glam::Mat4;

use super::context::Renderer;
use super::material::GpuMaterial;
use super::mesh::Mesh;

/// A mesh uploaded to the GPU together with its material and model transform.
///
/// `local_transform` places the mesh inside its entity (for example the node
/// transform of a glTF primitive); the entity transform is applied on top.
pub struct RenderObject {
    pub mesh: Mesh,
    pub local_transform: Mat4,
    pub material: GpuMaterial,
    pub(crate) model_buffer: wgpu::Buffer,
    pub(crate) model_bind_group: wgpu::BindGroup,
}

impl RenderObject {
    /// Upload a mesh and create its per-object uniforms
    pub fn new(
        renderer: &Renderer,
        mut mesh: Mesh,
        local_transform: Mat4,
        material: GpuMaterial,
    ) -> Self {
        renderer.upload_mesh(&mut mesh);
        let (model_buffer, model_bind_group) = renderer.create_model_bind_group(local_transform);
        Self {
            mesh,
            local_transform,
            material,
            model_buffer,
            model_bind_group,
        }
    }

    /// Place the object under an entity's world transform
    pub fn set_world_transform(&self, renderer: &Renderer, world: Mat4) {
        renderer.update_model_buffer(&self.model_buffer, world * self.local_transform);
    }
}
