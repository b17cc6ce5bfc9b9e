use crate::engine::Propagation;

/// Id of the canvas that cables are drawn onto.
pub const STAGE_CANVAS_ID: &str = "canvas";
/// Stage size used when the markup declares no stage canvas.
pub const DEFAULT_STAGE_SIZE: (f64, f64) = (1280.0, 720.0);
pub const DEFAULT_NODE_SIZE: (f64, f64) = (50.0, 50.0);
pub const DEFAULT_CANVAS_SIZE: (f64, f64) = (300.0, 150.0);
/// Largest canvas side browsers agree on.
pub const MAX_CANVAS_SIZE: u32 = 32_767;
/// Midpoint of an unconfigured range input.
pub const DEFAULT_CONTROL_VALUE: f64 = 50.0;

pub const LINE_WIDTH: f64 = 3.0;
pub const TRANSIENT_CABLE_COLOR: &str = "#FF0000";
pub const FIXED_CABLE_COLOR: &str = "#00FF00";
pub const TRACE_COLOR: &str = "#EE0000";

pub const SINE_FREQUENCY: f64 = 1.0;
pub const SINE_OFFSET: f64 = 10.0;
pub const SINE_AMPLITUDE: f64 = 50.0;

/// Half-width of the domain a display maps its pixel columns onto.
pub const DISPLAY_DOMAIN: f64 = 10.0;

/// Passes per cable of the legacy relaxation loop.
pub const RELAXATION_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelConfig {
    pub propagation: Propagation,
    pub stage_size: (f64, f64),
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            propagation: Propagation::default(),
            stage_size: DEFAULT_STAGE_SIZE,
        }
    }
}
