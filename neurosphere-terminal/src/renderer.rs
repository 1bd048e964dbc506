/// Character-cell rasterizer implementing the core draw surface
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use neurosphere_core::{DrawSurface, Rgba};
use std::io::Write;

/// Character luminosity ramp for contrast against the background (weakest to strongest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Contrast needed to reach the top of the ramp
const FULL_CONTRAST: f32 = 0.6;

/// Logical pixels covered by one terminal cell; cells are about twice as tall as wide
pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

/// Rasterizes lines and circles into a grid of colored characters
pub struct CellRenderer {
    width: usize,
    height: usize,
    background: Rgba,
    color_buffer: Vec<Rgba>,
}

impl CellRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            background: Rgba::WHITE,
            color_buffer: vec![Rgba::WHITE; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.color_buffer = vec![self.background; width * height];
    }

    pub fn columns(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> usize {
        self.height
    }

    /// Surface size in logical pixels
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.width as f32 * CELL_WIDTH,
            self.height as f32 * CELL_HEIGHT,
        )
    }

    fn blend_cell(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.color_buffer[idx] = color.over(self.color_buffer[idx]);
    }

    /// Ramp character for a cell, chosen by contrast with the background
    fn glyph(&self, color: Rgba) -> char {
        let contrast = (color.luminance() - self.background.luminance()).abs() / FULL_CONTRAST;
        let char_index = (contrast * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
        LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)]
    }

    /// Plain characters without color, one string per row
    pub fn to_text(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.glyph(self.color_buffer[y * self.width + x]))
                    .collect()
            })
            .collect()
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_terminal(self.background)))?;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let color = self.color_buffer[y * self.width + x];
                writer.queue(SetForegroundColor(to_terminal(color)))?;
                writer.queue(Print(self.glyph(color)))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DrawSurface for CellRenderer {
    fn clear(&mut self, color: Rgba, _width: f32, _height: f32) {
        self.background = color.with_alpha(1.0);
        for cell in &mut self.color_buffer {
            *cell = self.background;
        }
    }

    fn line(&mut self, from: Point2<f32>, to: Point2<f32>, color: Rgba, _width: f32) {
        let from = (
            f64::from(from.x / CELL_WIDTH),
            f64::from(from.y / CELL_HEIGHT),
        );
        let to = (f64::from(to.x / CELL_WIDTH), f64::from(to.y / CELL_HEIGHT));
        let Some(((x0, y0), (x1, y1))) = clip_segment(from, to, self.width, self.height) else {
            return;
        };

        // DDA in cell space, only over the visible part of the segment
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;

        let mut last = None;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let cell = (
                (x0 + (x1 - x0) * t).floor() as i64,
                (y0 + (y1 - y0) * t).floor() as i64,
            );
            if last != Some(cell) {
                self.blend_cell(cell.0, cell.1, color);
                last = Some(cell);
            }
        }
    }

    fn circle(&mut self, center: Point2<f32>, radius: f32, color: Rgba) {
        // Only cells inside the grid can be covered
        let min_x = (((center.x - radius) / CELL_WIDTH).floor() as i64).max(0);
        let max_x = (((center.x + radius) / CELL_WIDTH).floor() as i64).min(self.width as i64 - 1);
        let min_y = (((center.y - radius) / CELL_HEIGHT).floor() as i64).max(0);
        let max_y = (((center.y + radius) / CELL_HEIGHT).floor() as i64).min(self.height as i64 - 1);

        let mut covered = false;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = (x as f32 + 0.5) * CELL_WIDTH;
                let py = (y as f32 + 0.5) * CELL_HEIGHT;
                if (px - center.x).powi(2) + (py - center.y).powi(2) <= radius * radius {
                    self.blend_cell(x, y, color);
                    covered = true;
                }
            }
        }

        // Circles smaller than a cell still mark the cell holding their center
        if !covered {
            self.blend_cell(
                (center.x / CELL_WIDTH).floor() as i64,
                (center.y / CELL_HEIGHT).floor() as i64,
                color,
            );
        }
    }
}

/// Clip a cell-space segment to the `[0, columns] x [0, rows]` box (Liang-Barsky)
///
/// Returns `None` when nothing of the segment lies inside, or when an
/// endpoint is not finite.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    columns: usize,
    rows: usize,
) -> Option<((f64, f64), (f64, f64))> {
    let (x0, y0) = from;
    let (x1, y1) = to;
    if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
        return None;
    }

    let (dx, dy) = (x1 - x0, y1 - y0);
    let (columns, rows) = (columns as f64, rows as f64);
    let edges = [
        (-dx, x0),
        (dx, columns - x0),
        (-dy, y0),
        (dy, rows - y0),
    ];

    let (mut enter, mut exit) = (0.0_f64, 1.0_f64);
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                enter = enter.max(t);
            } else {
                exit = exit.min(t);
            }
        }
    }
    if enter > exit {
        return None;
    }

    Some((
        (x0 + dx * enter, y0 + dy * enter),
        (x0 + dx * exit, y0 + dy * exit),
    ))
}

fn to_terminal(color: Rgba) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_cells() {
        let mut renderer = CellRenderer::new(4, 2);
        renderer.circle(Point2::new(4.0, 8.0), 2.0, Rgba::BLACK);
        renderer.clear(Rgba::WHITE, 32.0, 32.0);
        assert!(renderer.to_text().iter().all(|row| row == "    "));
    }

    #[test]
    fn test_small_circle_marks_center_cell() {
        let mut renderer = CellRenderer::new(4, 2);
        renderer.clear(Rgba::WHITE, 32.0, 32.0);
        renderer.circle(Point2::new(12.0, 20.0), 2.0, Rgba::BLACK);

        let text = renderer.to_text();
        assert_eq!(text[0], "    ");
        assert_eq!(text[1], " @  ");
    }

    #[test]
    fn test_faint_color_uses_light_glyph() {
        let mut renderer = CellRenderer::new(3, 1);
        renderer.clear(Rgba::WHITE, 24.0, 16.0);
        renderer.circle(Point2::new(4.0, 8.0), 1.0, Rgba::BLACK.with_alpha(0.1));

        let glyph = renderer.to_text()[0].chars().next().unwrap();
        assert!(glyph != ' ' && glyph != '@');
    }

    #[test]
    fn test_line_covers_cells_between_endpoints() {
        let mut renderer = CellRenderer::new(5, 1);
        renderer.clear(Rgba::WHITE, 40.0, 16.0);
        renderer.line(Point2::new(4.0, 8.0), Point2::new(36.0, 8.0), Rgba::BLACK, 1.0);
        assert_eq!(renderer.to_text()[0], "@@@@@");
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut renderer = CellRenderer::new(2, 2);
        renderer.clear(Rgba::WHITE, 16.0, 32.0);
        renderer.circle(Point2::new(-50.0, -50.0), 3.0, Rgba::BLACK);
        renderer.line(Point2::new(-100.0, 0.0), Point2::new(-10.0, 0.0), Rgba::BLACK, 1.0);
        assert!(renderer.to_text().iter().all(|row| row == "  "));
    }

    #[test]
    fn test_far_offscreen_endpoint_is_clipped() {
        let mut renderer = CellRenderer::new(10, 5);
        renderer.clear(Rgba::WHITE, 80.0, 80.0);
        renderer.line(Point2::new(4.0, 8.0), Point2::new(4.0e9, 8.0), Rgba::BLACK, 1.0);

        let text = renderer.to_text();
        assert_eq!(text[0], "@@@@@@@@@@");
        assert!(text[1..].iter().all(|row| row == "          "));
    }

    #[test]
    fn test_segment_crossing_the_grid_is_clipped() {
        let mut renderer = CellRenderer::new(4, 3);
        renderer.clear(Rgba::WHITE, 32.0, 48.0);
        renderer.line(Point2::new(-1.0e7, 24.0), Point2::new(1.0e7, 24.0), Rgba::BLACK, 1.0);
        renderer.line(Point2::new(f32::NAN, 0.0), Point2::new(16.0, 16.0), Rgba::BLACK, 1.0);

        let text = renderer.to_text();
        assert_eq!(text, vec!["    ", "@@@@", "    "]);
    }

    #[test]
    fn test_clip_segment_outside_grid() {
        assert!(clip_segment((-5.0, 1.0), (-1.0, 2.0), 10, 5).is_none());
        assert!(clip_segment((1.0, 6.0), (9.0, 100.0), 10, 5).is_none());

        let ((x0, y0), (x1, y1)) = clip_segment((0.5, 0.5), (5.0e8, 0.5), 10, 5).unwrap();
        assert_eq!((x0, y0), (0.5, 0.5));
        assert!((x1 - 10.0).abs() < 1e-6);
        assert_eq!(y1, 0.5);
    }

    #[test]
    fn test_draw_emits_every_row() {
        let renderer = CellRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        assert!(!out.is_empty());
    }

    #[test]
    fn test_logical_size() {
        let mut renderer = CellRenderer::new(80, 24);
        assert_eq!(renderer.logical_size(), (640.0, 384.0));
        renderer.resize(40, 12);
        assert_eq!(renderer.logical_size(), (320.0, 192.0));
        assert_eq!((renderer.columns(), renderer.rows()), (40, 12));
    }
}
