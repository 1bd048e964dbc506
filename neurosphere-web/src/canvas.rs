/// Canvas 2D implementation of the core draw surface
use nalgebra::Point2;
use neurosphere_core::{DrawSurface, Rgba};
use web_sys::CanvasRenderingContext2d;

pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.context
    }
}

impl DrawSurface for CanvasSurface {
    fn clear(&mut self, color: Rgba, width: f32, height: f32) {
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn line(&mut self, from: Point2<f32>, to: Point2<f32>, color: Rgba, width: f32) {
        self.context.begin_path();
        self.context.move_to(from.x as f64, from.y as f64);
        self.context.line_to(to.x as f64, to.y as f64);
        self.context.set_stroke_style_str(&color.to_css());
        self.context.set_line_width(width as f64);
        self.context.stroke();
    }

    fn circle(&mut self, center: Point2<f32>, radius: f32, color: Rgba) {
        self.context.begin_path();
        // arc() only fails for a negative radius
        if self
            .context
            .arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .is_ok()
        {
            self.context.set_fill_style_str(&color.to_css());
            self.context.fill();
        }
    }
}
