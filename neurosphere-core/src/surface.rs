/// The drawing boundary between the renderer and its host
use nalgebra::Point2;

use crate::color::Rgba;

/// Immediate-mode 2D surface supplied by the host
///
/// Coordinates are logical pixels; hosts apply their own device scaling.
pub trait DrawSurface {
    /// Fill the whole surface with an opaque color
    fn clear(&mut self, color: Rgba, width: f32, height: f32);

    /// Stroke a straight segment
    fn line(&mut self, from: Point2<f32>, to: Point2<f32>, color: Rgba, width: f32);

    /// Fill a circle
    fn circle(&mut self, center: Point2<f32>, radius: f32, color: Rgba);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: Rgba,
        width: f32,
        height: f32,
    },
    Line {
        from: Point2<f32>,
        to: Point2<f32>,
        color: Rgba,
        width: f32,
    },
    Circle {
        center: Point2<f32>,
        radius: f32,
        color: Rgba,
    },
}

/// A surface that records commands instead of drawing them
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    /// Replay the recorded commands onto another surface
    pub fn replay<S: DrawSurface + ?Sized>(&self, target: &mut S) {
        for command in &self.commands {
            match *command {
                DrawCommand::Clear {
                    color,
                    width,
                    height,
                } => target.clear(color, width, height),
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    width,
                } => target.line(from, to, color, width),
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => target.circle(center, radius, color),
            }
        }
    }
}

impl DrawSurface for DisplayList {
    fn clear(&mut self, color: Rgba, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear {
            color,
            width,
            height,
        });
    }

    fn line(&mut self, from: Point2<f32>, to: Point2<f32>, color: Rgba, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn circle(&mut self, center: Point2<f32>, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
}
