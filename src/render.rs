use std::{collections::BTreeMap, fmt::Write};

use crate::{
    config::{
        DISPLAY_DOMAIN, FIXED_CABLE_COLOR, LINE_WIDTH, MAX_CANVAS_SIZE, TRACE_COLOR,
        TRANSIENT_CABLE_COLOR,
    },
    node::Waveform,
    signal::Signal,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen-space box of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn sized(width: f64, height: f64) -> Self {
        Self { left: 0.0, top: 0.0, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
}

impl Stroke {
    pub fn cable(mutable: bool) -> Self {
        let color = if mutable { TRANSIENT_CABLE_COLOR } else { FIXED_CABLE_COLOR };
        Self { color, width: LINE_WIDTH }
    }

    pub fn trace() -> Self {
        Self { color: TRACE_COLOR, width: LINE_WIDTH }
    }
}

/// Something 2D that can be drawn on.
pub trait Surface {
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    /// Strokes one connected polyline.
    fn stroke(&mut self, path: &[Point], stroke: Stroke);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Stroke { path: Vec<Point>, stroke: Stroke },
}

/// A surface that keeps every command it receives.
#[derive(Debug, Clone)]
pub struct Recording {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl Recording {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Paths stroked since the last clear.
    pub fn visible(&self) -> Vec<(&[Point], Stroke)> {
        let start = self
            .commands
            .iter()
            .rposition(|c| *c == DrawCommand::Clear)
            .map_or(0, |i| i + 1);
        self.commands[start..]
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Stroke { path, stroke } => Some((path.as_slice(), *stroke)),
                DrawCommand::Clear => None,
            })
            .collect()
    }

    /// The visible picture as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            self.width, self.height
        );
        for (path, stroke) in self.visible() {
            let points: Vec<String> = path.iter().map(|p| format!("{:.2},{:.2}", p.x, p.y)).collect();
            let _ = writeln!(
                svg,
                r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                points.join(" "),
                stroke.color,
                stroke.width
            );
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl Surface for Recording {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke(&mut self, path: &[Point], stroke: Stroke) {
        self.commands.push(DrawCommand::Stroke { path: path.to_vec(), stroke });
    }
}

/// Everything one render pass writes to.
#[derive(Debug)]
pub struct Scene<S> {
    /// Shared surface the cables are drawn on.
    pub stage: S,
    /// Private surfaces of display nodes, by canvas id.
    pub canvases: BTreeMap<String, S>,
    /// Class string of every node, by node id.
    pub classes: BTreeMap<String, String>,
}

impl<S: Surface> Scene<S> {
    pub fn new(stage: S) -> Self {
        Self { stage, canvases: BTreeMap::new(), classes: BTreeMap::new() }
    }

    pub fn attach(&mut self, canvas: impl Into<String>, surface: S) {
        self.canvases.insert(canvas.into(), surface);
    }

    pub fn class_of(&self, node: &str) -> Option<&str> {
        self.classes.get(node).map(String::as_str)
    }
}

/// Draws what a display node shows for `signal`: a sampled sine when the
/// signal carries one, a flat line when it is merely active, else nothing.
pub fn draw_display<S: Surface + ?Sized>(surface: &mut S, signal: &Signal) {
    surface.clear();
    if signal.is_sin() {
        // A sine signal missing its parameters has nothing to show.
        if let Some(wave) = Waveform::from_signal(signal) {
            plot(surface, |x| wave.sample(x));
        }
    } else if signal.is_active() {
        plot(surface, |_| 1.0);
    }
}

fn plot<S: Surface + ?Sized>(surface: &mut S, f: impl Fn(f64) -> f64) {
    let (width, height) = surface.size();
    let map_x = |x: f64| (x - width / 2.0) / width * 2.0 * DISPLAY_DOMAIN;
    let to_y = |y: f64| y + height / 2.0;

    // Saturating cast: NaN and negatives give no columns.
    let columns = (width as u32).min(MAX_CANVAS_SIZE);
    let mut path = Vec::with_capacity(columns as usize + 1);
    path.push(Point::new(0.0, to_y(f(0.0))));
    for col in 0..columns {
        let x = f64::from(col);
        path.push(Point::new(x, to_y(f(map_x(x)))));
    }
    surface.stroke(&path, Stroke::trace());
}

/// Draws a cable between two element centers, relative to the stage origin.
pub fn draw_cable<S: Surface + ?Sized>(surface: &mut S, stage: Rect, a: Rect, b: Rect, mutable: bool) {
    let offset = |p: Point| Point::new(p.x - stage.left, p.y - stage.top);
    surface.stroke(&[offset(a.center()), offset(b.center())], Stroke::cable(mutable));
}
