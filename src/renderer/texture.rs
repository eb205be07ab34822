//! Texture loading and GPU management
//!
//! Provides texture loading from files and GPU upload for rendering.

use std::path::Path;

use image::RgbaImage;
use wgpu::util::DeviceExt;

/// How texel values are interpreted when sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Color data, decoded from sRGB on sampling
    Srgb,
    /// Non-color data (roughness, normals, occlusion)
    Linear,
}

impl ColorSpace {
    fn format(self) -> wgpu::TextureFormat {
        match self {
            Self::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            Self::Linear => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// A GPU texture with its view and sampler
#[derive(Debug)]
pub struct Texture {
    /// The GPU texture
    pub texture: wgpu::Texture,
    /// Texture view for binding
    pub view: wgpu::TextureView,
    /// Sampler for texture filtering
    pub sampler: wgpu::Sampler,
    /// Texture dimensions
    pub size: wgpu::Extent3d,
}

/// Read and decode an image file into RGBA8
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded
pub fn load_rgba(path: impl AsRef<Path>) -> Result<RgbaImage, TextureError> {
    let bytes = std::fs::read(path.as_ref()).map_err(|e| TextureError::IoError(e.to_string()))?;
    decode_rgba(&bytes)
}

/// Decode image bytes (PNG, JPEG) into RGBA8
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, TextureError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| TextureError::DecodeError(e.to_string()))
}

impl Texture {
    /// Load a texture from a file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        color_space: ColorSpace,
    ) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = load_rgba(path)?;
        let label = path.to_string_lossy();
        Ok(Self::from_image(device, queue, &img, color_space, Some(&label)))
    }

    /// Create a texture from a decoded RGBA image
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &RgbaImage,
        color_space: ColorSpace,
        label: Option<&str>,
    ) -> Self {
        Self::upload(device, queue, img.as_raw(), img.dimensions(), color_space, label)
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        dimensions: (u32, u32),
        color_space: ColorSpace,
        label: Option<&str>,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label,
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: color_space.format(),
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size,
        }
    }

    /// Create a 1x1 texture of one color
    #[must_use]
    pub fn solid_color(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color: [u8; 4],
        color_space: ColorSpace,
    ) -> Self {
        Self::upload(
            device,
            queue,
            &color,
            (1, 1),
            color_space,
            Some("solid_color_texture"),
        )
    }
}

/// Errors that can occur during texture loading
#[derive(Debug, Clone)]
pub enum TextureError {
    /// IO error reading file
    IoError(String),
    /// Error decoding image data
    DecodeError(String),
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DecodeError(e) => write!(f, "Decode error: {e}"),
        }
    }
}

impl std::error::Error for TextureError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png() {
        let img = RgbaImage::from_pixel(2, 3, image::Rgba([255, 128, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_rgba(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (2, 3));
        assert_eq!(decoded.get_pixel(1, 2).0, [255, 128, 0, 255]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            decode_rgba(b"not an image"),
            Err(TextureError::DecodeError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_rgba("static/textures/none.jpg"),
            Err(TextureError::IoError(_))
        ));
    }
}
