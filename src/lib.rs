//! A patch panel simulation: nodes wired by cables, signals flowing out
//! from power nodes, and a renderer that turns the result into node classes,
//! cable lines and oscilloscope traces.

pub mod cables;
pub mod config;
pub mod controls;
pub mod engine;
pub mod markup;
pub mod node;
pub mod panel;
pub mod render;
pub mod session;
pub mod signal;

mod error;

pub use error::{PanelError, Result};
pub use panel::{Interaction, Panel};
pub use session::{EventSender, PanelEvent, Session};
pub use signal::{Signal, Value};
