//! glTF model loading
//!
//! A model is flattened into parts: one per triangle primitive of every node
//! reachable from the default scene, each carrying the node's accumulated
//! transform. Parts are plain CPU data so they can be inspected and tested
//! without a GPU.

use std::path::Path;

use glam::{Mat4, Vec3, Vec4};
use image::RgbaImage;

use crate::interaction::PickShape;
use crate::renderer::{Material, Mesh, Vertex};

/// One drawable primitive of a model
#[derive(Debug)]
pub struct ModelPart {
    /// Node name, if the file gives one
    pub name: Option<String>,
    /// Model-from-part transform
    pub transform: Mat4,
    pub mesh: Mesh,
    pub material: Material,
    /// Decoded base color texture (sRGB)
    pub base_color_image: Option<RgbaImage>,
}

/// A loaded model
#[derive(Debug, Default)]
pub struct Model {
    pub parts: Vec<ModelPart>,
}

impl Model {
    /// Load a `.gltf` or `.glb` file with its buffers and images
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be imported or holds no triangles
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let (document, buffers, images) =
            gltf::import(path).map_err(|e| ModelError::Import(format!("{}: {e}", path.display())))?;
        let model = Self::from_document(&document, &buffers, &images)?;

        log::info!(
            "Loaded model {} ({} parts, {} triangles)",
            path.display(),
            model.parts.len(),
            model.triangle_count()
        );
        Ok(model)
    }

    /// Load a self-contained model (GLB or glTF with embedded data)
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be imported or holds no triangles
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let (document, buffers, images) =
            gltf::import_slice(bytes).map_err(|e| ModelError::Import(e.to_string()))?;
        Self::from_document(&document, &buffers, &images)
    }

    fn from_document(
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
        images: &[gltf::image::Data],
    ) -> Result<Self, ModelError> {
        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or(ModelError::NoScene)?;

        let mut model = Self::default();
        for node in scene.nodes() {
            model.add_node(&node, Mat4::IDENTITY, buffers, images);
        }

        if model.parts.is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(model)
    }

    fn add_node(
        &mut self,
        node: &gltf::Node<'_>,
        parent: Mat4,
        buffers: &[gltf::buffer::Data],
        images: &[gltf::image::Data],
    ) {
        let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::warn!(
                        "Skipping {:?} primitive in mesh {:?}",
                        primitive.mode(),
                        mesh.name()
                    );
                    continue;
                }
                if let Some(part) = read_primitive(&primitive, transform, buffers, images) {
                    self.parts.push(ModelPart {
                        name: node.name().map(str::to_string),
                        ..part
                    });
                }
            }
        }

        for child in node.children() {
            self.add_node(&child, transform, buffers, images);
        }
    }

    /// Total triangles over all parts
    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.indices.len() / 3).sum()
    }

    /// Triangles of every part, in model space
    pub fn pick_shape(&self) -> PickShape {
        let mut shape = PickShape::default();
        for part in &self.parts {
            shape.extend_indexed(&part.mesh.positions(), &part.mesh.indices, part.transform);
        }
        shape
    }
}

fn read_primitive(
    primitive: &gltf::Primitive<'_>,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> Option<ModelPart> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    if positions.is_empty() {
        return None;
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let normals: Vec<[f32; 3]> = match reader.read_normals() {
        Some(normals) => normals.collect(),
        None => compute_normals(&positions, &indices),
    };

    let pbr = primitive.material().pbr_metallic_roughness();
    let texture = pbr.base_color_texture();
    let tex_set = texture.as_ref().map_or(0, |info| info.tex_coord());
    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(tex_set)
        .map(|uvs| uvs.into_f32().collect())
        .unwrap_or_default();

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, position)| {
            Vertex::new(
                *position,
                normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uvs.get(i).copied().unwrap_or([0.0, 0.0]),
            )
        })
        .collect();

    let mut material = Material::new(Vec3::ONE);
    material.base_color = Vec4::from_array(pbr.base_color_factor());
    material.roughness = pbr.roughness_factor().clamp(0.0, 1.0);

    let base_color_image = texture
        .and_then(|info| images.get(info.texture().source().index()))
        .and_then(image_to_rgba);

    Some(ModelPart {
        name: None,
        transform,
        mesh: Mesh::from_data(vertices, indices),
        material,
        base_color_image,
    })
}

/// Area-weighted vertex normals for meshes that ship without them
fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        if a.max(b).max(c) >= positions.len() {
            continue;
        }
        let [pa, pb, pc] = [a, b, c].map(|i| Vec3::from_array(positions[i]));
        let face = (pb - pa).cross(pc - pa);
        for i in [a, b, c] {
            normals[i] += face;
        }
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

fn image_to_rgba(data: &gltf::image::Data) -> Option<RgbaImage> {
    use gltf::image::Format;

    let pixels = match data.format {
        Format::R8G8B8A8 => data.pixels.clone(),
        Format::R8G8B8 => data
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8 => data.pixels.iter().flat_map(|&p| [p, p, p, 255]).collect(),
        other => {
            log::warn!("Unsupported glTF image format {other:?}");
            return None;
        }
    };
    RgbaImage::from_raw(data.width, data.height, pixels)
}

/// Errors that can occur while loading a model
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The file or its buffers could not be read or parsed
    Import(String),
    /// The document has no scene
    NoScene,
    /// No triangle primitives were found
    Empty,
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Import(e) => write!(f, "Failed to import model: {e}"),
            Self::NoScene => write!(f, "Model has no scene"),
            Self::Empty => write!(f, "Model has no triangle meshes"),
        }
    }
}

impl std::error::Error for ModelError {}
