//! Rendering module
//!
//! Forward rendering with wgpu: one shadowed directional light, ambient light,
//! textured standard materials and a debug wireframe overlay.

mod camera;
mod context;
mod lights;
mod lines;
mod material;
mod mesh;
mod object;
mod shadow;
mod texture;

pub use camera::Camera;
pub use context::{ModelUniform, RenderFrame, Renderer, RendererError};
pub use lights::{AmbientLight, DirectionalLight, LightUniform, SceneLights};
pub use lines::LineVertex;
pub use material::{GpuMaterial, Material, MaterialMaps, MaterialUniform};
pub use mesh::{Mesh, Vertex};
pub use object::RenderObject;
pub use shadow::{ShadowConfig, ShadowMap, ShadowUniform};
pub use texture::{ColorSpace, Texture, TextureError, decode_rgba, load_rgba};
