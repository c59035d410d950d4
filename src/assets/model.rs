//! glTF model import and GPU upload
//!
//! Loading is split in two: [`ModelData`] holds decoded CPU-side data and can
//! be produced on any thread, while [`Model::upload`] creates the GPU
//! resources and must run where the renderer lives.

use std::path::Path;

use glam::Mat4;

use crate::renderer::{Mesh, Renderer, Vertex};

/// Errors that can occur while loading a model
#[derive(Debug)]
pub enum ModelError {
    /// Failed to read or parse the glTF file
    Gltf(String),
    /// The file contained no drawable primitives
    Empty(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gltf(e) => write!(f, "glTF error: {e}"),
            Self::Empty(path) => write!(f, "no drawable primitives in {path}"),
        }
    }
}

impl std::error::Error for ModelError {}

/// CPU-side material data
#[derive(Debug, Clone)]
pub struct MaterialData {
    /// Base color factor (RGBA)
    pub base_color: [f32; 4],
    /// Decoded RGBA8 base color texture, if the material has one
    pub base_color_image: Option<ImageData>,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            base_color: [1.0; 4],
            base_color_image: None,
        }
    }
}

/// Decoded RGBA8 pixels
#[derive(Debug, Clone)]
pub struct ImageData {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// One primitive's geometry and material, pre-upload
#[derive(Debug)]
pub struct PrimitiveData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: MaterialData,
}

/// A fully decoded model, ready for GPU upload
#[derive(Debug)]
pub struct ModelData {
    pub name: String,
    pub primitives: Vec<PrimitiveData>,
}

impl ModelData {
    /// Load and decode a glTF or GLB file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        let (document, buffers, images) =
            gltf::import(path).map_err(|e| ModelError::Gltf(e.to_string()))?;

        let mut primitives = Vec::new();
        for mesh in document.meshes() {
            for primitive in mesh.primitives() {
                let reader = primitive
                    .reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

                let Some(positions) = reader.read_positions() else {
                    continue;
                };
                let positions: Vec<[f32; 3]> = positions.collect();

                let normals: Vec<[f32; 3]> = reader
                    .read_normals()
                    .map(|iter| iter.collect())
                    .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);

                let uvs: Vec<[f32; 2]> = reader
                    .read_tex_coords(0)
                    .map(|iter| iter.into_f32().collect())
                    .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);

                let vertices: Vec<Vertex> = positions
                    .iter()
                    .enumerate()
                    .map(|(i, &position)| {
                        Vertex::new(
                            position,
                            normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                            uvs.get(i).copied().unwrap_or([0.0, 0.0]),
                        )
                    })
                    .collect();

                let indices: Vec<u32> = reader
                    .read_indices()
                    .map(|iter| iter.into_u32().collect())
                    .unwrap_or_else(|| (0..vertices.len() as u32).collect());

                let material = read_material(&primitive, &images);

                primitives.push(PrimitiveData {
                    vertices,
                    indices,
                    material,
                });
            }
        }

        if primitives.is_empty() {
            return Err(ModelError::Empty(path.display().to_string()));
        }

        log::info!("Loaded model '{}' ({} primitives)", name, primitives.len());

        Ok(Self { name, primitives })
    }
}

fn read_material(primitive: &gltf::Primitive, images: &[gltf::image::Data]) -> MaterialData {
    let pbr = primitive.material().pbr_metallic_roughness();

    let base_color_image = pbr
        .base_color_texture()
        .and_then(|info| images.get(info.texture().source().index()))
        .and_then(to_rgba8);

    MaterialData {
        base_color: pbr.base_color_factor(),
        base_color_image,
    }
}

/// Expand a glTF image to RGBA8; unsupported formats fall back to the
/// base color factor alone.
fn to_rgba8(data: &gltf::image::Data) -> Option<ImageData> {
    use gltf::image::Format;

    let pixels = match data.format {
        Format::R8G8B8A8 => data.pixels.clone(),
        Format::R8G8B8 => data
            .pixels
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect(),
        other => {
            log::warn!("Unsupported texture format {:?}, skipping", other);
            return None;
        }
    };

    Some(ImageData {
        pixels,
        width: data.width,
        height: data.height,
    })
}

/// A primitive with its GPU resources
pub struct Primitive {
    pub mesh: Mesh,
    material_bind_group: wgpu::BindGroup,
}

/// A model uploaded to the GPU
pub struct Model {
    pub name: String,
    pub transform: Mat4,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    pub primitives: Vec<Primitive>,
}

impl Model {
    /// Create GPU resources for decoded model data
    pub fn upload(data: ModelData, renderer: &Renderer) -> Self {
        let transform = Mat4::IDENTITY;
        let (model_buffer, model_bind_group) = renderer.create_model_bind_group(transform);

        let primitives = data
            .primitives
            .into_iter()
            .map(|primitive| {
                let mut mesh = Mesh::from_data(primitive.vertices, primitive.indices);
                renderer.upload_mesh(&mut mesh);

                let texture = primitive.material.base_color_image.map(|image| {
                    crate::renderer::Texture::from_rgba(
                        renderer.device(),
                        renderer.queue(),
                        &image.pixels,
                        (image.width, image.height),
                        Some("model_base_color"),
                    )
                });

                let material_bind_group = renderer
                    .create_material_bind_group(primitive.material.base_color, texture.as_ref());

                Primitive {
                    mesh,
                    material_bind_group,
                }
            })
            .collect();

        Self {
            name: data.name,
            transform,
            model_buffer,
            model_bind_group,
            primitives,
        }
    }

    /// Update the model's world transform
    pub fn set_transform(&mut self, renderer: &Renderer, transform: Mat4) {
        self.transform = transform;
        renderer.update_model_buffer(&self.model_buffer, transform);
    }

    /// Draw every primitive
    pub fn draw<'a>(&'a self, renderer: &'a Renderer, render_pass: &mut wgpu::RenderPass<'a>) {
        for primitive in &self.primitives {
            renderer.draw_mesh(
                render_pass,
                &primitive.mesh,
                &self.model_bind_group,
                Some(&primitive.material_bind_group),
            );
        }
    }
}
