/// Example: Render a few frames headlessly and print the last one as text
///
/// Usage: cargo run --example snapshot -- [frames] [columns] [rows]

use std::env;
use neurosphere_core::{FrameStats, SceneConfig, SphereRenderer};
use neurosphere_terminal::CellRenderer;

fn main() {
    let args: Vec<String> = env::args().collect();
    let arg = |i: usize, default: usize| {
        args.get(i)
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    };
    let frames = arg(1, 90);
    let (columns, rows) = (arg(2, 100), arg(3, 30));

    let mut cells = CellRenderer::new(columns, rows);
    let (width, height) = cells.logical_size();

    let mut sphere = SphereRenderer::new(SceneConfig::default());
    sphere.resize(width, height, 1.0);

    let mut stats = FrameStats::default();
    for _ in 0..frames {
        stats = sphere.frame(&mut cells);
    }

    for row in cells.to_text() {
        println!("{}", row);
    }
    println!(
        "frame {}: {} nodes, {} links visible",
        frames, stats.nodes, stats.links
    );
}
