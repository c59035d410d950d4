//! Immediate-mode debug UI

mod overlay;

pub use overlay::DebugOverlay;
