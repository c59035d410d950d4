//! Engine core: the main loop, timing, and debug state

mod debug;
mod engine;
mod time;

pub use debug::{DebugInfo, FrameStats};
pub use engine::{Engine, EngineConfig, EngineContext, Game};
pub use time::{FixedStep, Time};
