//! Input handling
//!
//! Raw device state tracking plus a named-action binding layer with
//! press/hold/release edge detection.

mod binding;
mod manager;
mod state;

pub use binding::{Binding, EdgeEvent};
pub use manager::{ActionCallback, InputError, InputFrame, InputManager};
pub use state::DeviceState;
