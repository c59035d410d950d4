//! glint: a small real-time 3D engine
//!
//! A windowed renderer built on winit and wgpu with an action-based input
//! system, background glTF loading, and an egui debug overlay. Applications
//! implement the [`core::Game`] trait and hand it to [`core::Engine`].

pub mod assets;
pub mod core;
pub mod input;
pub mod renderer;
pub mod ui;

// Re-export the crates that appear in the public API.
pub use egui;
pub use glam;
pub use wgpu;
pub use winit;

/// Common imports for applications
pub mod prelude {
    pub use crate::assets::{Model, ModelData, ModelLoader};
    pub use crate::core::{Engine, EngineConfig, EngineContext, Game};
    pub use crate::input::{Binding, EdgeEvent, InputError, InputFrame, InputManager};
    pub use crate::renderer::{Camera, Light, Mesh, Movement, RenderFrame, Renderer, Texture};
    pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
}
