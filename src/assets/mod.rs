//! Asset loading: glTF models, decoded off-thread and uploaded on demand

mod loader;
mod model;

pub use loader::{LoadTask, ModelLoader};
pub use model::{ImageData, MaterialData, Model, ModelData, ModelError, Primitive, PrimitiveData};
