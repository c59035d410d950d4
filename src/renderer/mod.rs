//! Rendering: wgpu device management, pipelines, camera, meshes, and textures

mod camera;
mod context;
mod mesh;
mod texture;

pub use camera::{Camera, Movement};
pub use context::{Light, ModelUniform, RenderFrame, Renderer};
pub use mesh::{Mesh, Vertex};
pub use texture::{Texture, TextureError};
