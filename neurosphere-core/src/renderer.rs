/// The sphere renderer: owns the node set and animation phase, advances them
/// each frame and emits draw calls in depth order
use log::debug;
use nalgebra::Point2;

use crate::config::SceneConfig;
use crate::projection::{depth_order, Perspective};
use crate::sphere::{self, Node};
use crate::surface::DrawSurface;
use crate::transform::{AnimationPhase, Transform};
use crate::wave::{self, Wave};

/// Logical size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Device pixels per logical pixel
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
        }
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn same_size(&self, other: &Viewport) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// What a single frame put on the surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub nodes: usize,
    pub links: usize,
}

pub struct SphereRenderer {
    config: SceneConfig,
    viewport: Option<Viewport>,
    radius: f32,
    nodes: Vec<Node>,
    phase: AnimationPhase,
    /// Manual turn added on top of the animated rotation
    spin_offset: f32,
}

impl SphereRenderer {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            viewport: None,
            radius: 0.0,
            nodes: Vec::new(),
            phase: AnimationPhase::zero(),
            spin_offset: 0.0,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn spin_offset(&self) -> f32 {
        self.spin_offset
    }

    /// Turn the sphere by an extra amount
    ///
    /// The animation phase keeps advancing on its own; the nudge is kept as a
    /// separate offset applied when nodes are rotated.
    pub fn nudge_rotation(&mut self, delta: f32) {
        self.spin_offset += delta;
    }

    /// Track the surface size, rebuilding the node set when it changes
    ///
    /// Returns `true` when the nodes were regenerated. A change in pixel
    /// ratio alone keeps the current nodes.
    pub fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32) -> bool {
        let next = Viewport::new(width, height, pixel_ratio);
        let changed = self.viewport.map_or(true, |current| !current.same_size(&next));
        self.viewport = Some(next);

        if changed {
            self.rebuild(next);
        }
        changed
    }

    fn rebuild(&mut self, viewport: Viewport) {
        self.radius = viewport.min_side() * self.config.radius_factor;
        self.nodes = sphere::generate(
            self.config.node_count,
            self.radius,
            self.config.link_distance_factor,
        );

        debug!(
            "rebuilt {} nodes ({} links) for {}x{} viewport, radius {:.1}",
            self.nodes.len(),
            self.nodes.iter().map(|n| n.neighbors.len()).sum::<usize>() / 2,
            viewport.width,
            viewport.height,
            self.radius
        );
    }

    fn perspective(&self) -> Perspective {
        let (width, height) = self
            .viewport
            .map_or((0.0, 0.0), |vp| (vp.width, vp.height));
        Perspective::new(
            self.config.focal_distance,
            Point2::new(
                width * self.config.center_x_factor,
                height * self.config.center_y_factor,
            ),
        )
    }

    /// Advance the animation and recompute every node's screen state
    pub fn update(&mut self) {
        self.phase
            .advance(self.config.rotation_step, self.config.wave_step);

        let rotation =
            Transform::spin_then_tilt(self.phase.rotation + self.spin_offset, self.config.tilt);
        let perspective = self.perspective();
        let pulse = Wave::new(self.config.wave_half_width, self.config.decay);
        let wave_position = Wave::position(self.phase.wave);
        let radius = self.radius;

        for node in &mut self.nodes {
            let local = Transform::to_local(&node.position, &rotation);

            match perspective.project(&local) {
                Some(projected) => {
                    node.screen = Some(projected.screen);
                    node.depth = projected.depth;
                }
                None => {
                    node.screen = None;
                    node.depth = local.z;
                }
            }

            node.activation =
                pulse.excite(node.activation, wave::normalize(local.x, radius), wave_position);
        }
    }

    /// Whether a node from the latest update is drawn at all
    pub fn is_visible(&self, index: usize) -> bool {
        self.nodes
            .get(index)
            .map_or(false, |n| n.screen.is_some() && self.config.facing.faces_viewer(n.depth))
    }

    /// Node indices in painting order
    pub fn draw_order(&self) -> Vec<usize> {
        self.config
            .paint_order
            .arrange(self.config.facing, depth_order(self.nodes.iter().map(|n| n.depth)))
    }

    /// Links between visible nodes in painting order, each unordered pair once
    pub fn visible_links(&self, order: &[usize]) -> Vec<(usize, usize)> {
        let mut links = Vec::new();
        for &i in order {
            if !self.is_visible(i) {
                continue;
            }
            for &j in &self.nodes[i].neighbors {
                if j > i && self.is_visible(j) {
                    links.push((i, j));
                }
            }
        }
        links
    }

    /// Paint the current state onto `surface`
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) -> FrameStats {
        let style = &self.config.style;
        let (width, height) = self
            .viewport
            .map_or((0.0, 0.0), |vp| (vp.width, vp.height));

        surface.clear(style.background.with_alpha(1.0), width, height);

        let order = self.draw_order();
        let links = self.visible_links(&order);

        for &(i, j) in &links {
            let (a, b) = (&self.nodes[i], &self.nodes[j]);
            let (Some(from), Some(to)) = (a.screen, b.screen) else {
                continue;
            };

            let avg = (a.activation + b.activation) / 2.0;
            let opacity = style.link_base_opacity + avg * style.link_active_opacity;
            let line_width = style.link_base_width + avg * style.link_active_width;
            surface.line(from, to, style.link_color.with_alpha(opacity), line_width);
        }

        let mut drawn = 0;
        for &i in &order {
            if !self.is_visible(i) {
                continue;
            }
            let node = &self.nodes[i];
            let Some(center) = node.screen else {
                continue;
            };
            let activation = node.activation;
            let size = style.node_base_size + activation * style.node_active_size;

            if activation > style.glow_threshold {
                surface.circle(
                    center,
                    size * style.glow_scale,
                    style.glow_color.with_alpha(activation * style.glow_opacity),
                );
            }

            let brightness = style.node_base_brightness + activation * style.node_active_brightness;
            let opacity = style.node_base_opacity + activation * style.node_active_opacity;
            surface.circle(
                center,
                size,
                style.node_color.scaled(brightness).with_alpha(opacity),
            );

            if activation > style.highlight_threshold {
                surface.circle(
                    center,
                    size * style.highlight_scale,
                    style
                        .highlight_color
                        .with_alpha(activation * style.highlight_opacity),
                );
            }
            drawn += 1;
        }

        FrameStats {
            nodes: drawn,
            links: links.len(),
        }
    }

    /// Advance one frame and draw it
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        self.update();
        self.draw(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::projection::{Facing, PaintOrder};
    use crate::surface::{DisplayList, DrawCommand};
    use std::collections::HashSet;

    fn plain_config() -> SceneConfig {
        let mut config = SceneConfig::default();
        // no glow or highlight circles, one circle per node
        config.style.glow_threshold = 2.0;
        config.style.highlight_threshold = 2.0;
        config
    }

    #[test]
    fn test_draw_before_resize_only_clears() {
        let mut renderer = SphereRenderer::new(SceneConfig::default());
        let mut list = DisplayList::new();
        let stats = renderer.frame(&mut list);

        assert_eq!(stats, FrameStats::default());
        assert_eq!(
            list.commands,
            vec![DrawCommand::Clear {
                color: Rgba::WHITE,
                width: 0.0,
                height: 0.0
            }]
        );
    }

    #[test]
    fn test_resize_replaces_node_set() {
        let mut renderer = SphereRenderer::new(SceneConfig::default());
        assert!(renderer.resize(800.0, 600.0, 1.0));
        assert_eq!(renderer.nodes().len(), 180);
        assert!((renderer.radius() - 420.0).abs() < 1e-3);

        let mut list = DisplayList::new();
        for _ in 0..30 {
            list.clear_commands();
            renderer.frame(&mut list);
        }

        assert!(renderer.resize(400.0, 300.0, 1.0));
        assert!((renderer.radius() - 210.0).abs() < 1e-3);
        assert_eq!(renderer.nodes().len(), 180);
        for node in renderer.nodes() {
            assert!((node.position.coords.norm() - 210.0).abs() < 1e-2);
            assert_eq!(node.activation, 0.0);
        }

        list.clear_commands();
        renderer.frame(&mut list);
        for command in list.circles() {
            if let DrawCommand::Circle { center, .. } = command {
                // the new sphere is centered at (340, 150) and cannot reach past these bounds
                assert!((center.x - 340.0).abs() < 300.0);
                assert!((center.y - 150.0).abs() < 300.0);
            }
        }
    }

    #[test]
    fn test_same_size_keeps_nodes() {
        let mut renderer = SphereRenderer::new(SceneConfig::default());
        renderer.resize(800.0, 600.0, 1.0);
        let mut list = DisplayList::new();
        for _ in 0..40 {
            renderer.frame(&mut list);
        }
        let before: Vec<f32> = renderer.nodes().iter().map(|n| n.activation).collect();

        assert!(!renderer.resize(800.0, 600.0, 2.0));
        let after: Vec<f32> = renderer.nodes().iter().map(|n| n.activation).collect();
        assert_eq!(before, after);
        assert_eq!(renderer.viewport().unwrap().pixel_ratio, 2.0);
    }

    #[test]
    fn test_activation_bounded_over_many_frames() {
        let mut renderer = SphereRenderer::new(SceneConfig::default());
        renderer.resize(640.0, 480.0, 1.0);
        let mut list = DisplayList::new();

        let mut peak = 0.0_f32;
        for _ in 0..600 {
            list.clear_commands();
            renderer.frame(&mut list);
            for node in renderer.nodes() {
                assert!((0.0..=1.0).contains(&node.activation));
                peak = peak.max(node.activation);
            }
        }
        assert!(peak > 0.6);
    }

    #[test]
    fn test_links_drawn_once_per_pair() {
        let mut renderer = SphereRenderer::new(SceneConfig::default());
        renderer.resize(800.0, 600.0, 1.0);
        let mut list = DisplayList::new();
        let stats = renderer.frame(&mut list);

        let links = renderer.visible_links(&renderer.draw_order());
        assert!(!links.is_empty());
        assert_eq!(stats.links, links.len());
        assert_eq!(list.lines().count(), links.len());

        let mut seen = HashSet::new();
        for &(i, j) in &links {
            assert!(i < j);
            assert!(seen.insert((i, j)), "pair ({i}, {j}) drawn twice");
        }
    }

    #[test]
    fn test_only_facing_nodes_are_drawn() {
        let mut renderer = SphereRenderer::new(plain_config());
        renderer.resize(800.0, 600.0, 1.0);
        let mut list = DisplayList::new();
        let stats = renderer.frame(&mut list);

        let facing = renderer.nodes().iter().filter(|n| n.depth < 0.0).count();
        assert!(facing > 0 && facing < 180);
        assert_eq!(stats.nodes, facing);
        assert_eq!(list.circles().count(), facing);
    }

    #[test]
    fn test_positive_depth_convention() {
        let mut config = plain_config();
        config.facing = Facing::PositiveDepth;
        let mut renderer = SphereRenderer::new(config);
        renderer.resize(800.0, 600.0, 1.0);
        let mut list = DisplayList::new();
        let stats = renderer.frame(&mut list);

        let facing = renderer.nodes().iter().filter(|n| n.depth > 0.0).count();
        assert_eq!(stats.nodes, facing);

        let order = renderer.draw_order();
        let nodes = renderer.nodes();
        for pair in order.windows(2) {
            assert!(nodes[pair[0]].depth <= nodes[pair[1]].depth);
        }
    }

    #[test]
    fn test_draw_order_is_ascending_by_default() {
        let mut renderer = SphereRenderer::new(SceneConfig::default());
        renderer.resize(800.0, 600.0, 1.0);
        renderer.update();

        let order = renderer.draw_order();
        assert_eq!(order.len(), 180);
        let nodes = renderer.nodes();
        for pair in order.windows(2) {
            assert!(nodes[pair[0]].depth <= nodes[pair[1]].depth);
        }
    }

    #[test]
    fn test_back_to_front_paints_far_nodes_first() {
        let mut config = SceneConfig::default();
        config.paint_order = PaintOrder::BackToFront;
        let mut renderer = SphereRenderer::new(config);
        renderer.resize(800.0, 600.0, 1.0);
        renderer.update();

        let order = renderer.draw_order();
        assert_eq!(order.len(), 180);
        let nodes = renderer.nodes();
        // negative depth faces the viewer, so depths run from high to low
        for pair in order.windows(2) {
            assert!(nodes[pair[0]].depth >= nodes[pair[1]].depth);
        }
    }

    #[test]
    fn test_nudge_keeps_phase_monotonic() {
        let mut renderer = SphereRenderer::new(SceneConfig::default());
        renderer.resize(800.0, 600.0, 1.0);

        let mut last = renderer.phase().rotation;
        for _ in 0..10 {
            renderer.nudge_rotation(-0.5);
            renderer.update();
            let rotation = renderer.phase().rotation;
            assert!(rotation > last);
            last = rotation;
        }
        assert!((renderer.spin_offset() + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_nudge_turns_the_sphere() {
        let mut plain = SphereRenderer::new(SceneConfig::default());
        let mut nudged = SphereRenderer::new(SceneConfig::default());
        plain.resize(800.0, 600.0, 1.0);
        nudged.resize(800.0, 600.0, 1.0);

        nudged.nudge_rotation(0.2);
        plain.update();
        nudged.update();

        assert_eq!(plain.phase(), nudged.phase());
        let moved = plain
            .nodes()
            .iter()
            .zip(nudged.nodes())
            .any(|(a, b)| (a.depth - b.depth).abs() > 1e-3);
        assert!(moved);
    }

    #[test]
    fn test_degenerate_viewport_draws_no_nodes() {
        let mut renderer = SphereRenderer::new(SceneConfig::default());
        assert!(renderer.resize(0.0, 600.0, 1.0));
        assert_eq!(renderer.radius(), 0.0);

        let mut list = DisplayList::new();
        let stats = renderer.frame(&mut list);
        assert_eq!(stats, FrameStats::default());
        for node in renderer.nodes() {
            assert!(node.activation.is_finite());
            assert!(node.depth.is_finite());
        }
    }

    #[test]
    fn test_single_node_scene() {
        let mut config = SceneConfig::default();
        config.node_count = 1;
        let mut renderer = SphereRenderer::new(config);
        renderer.resize(200.0, 200.0, 1.0);

        let mut list = DisplayList::new();
        for _ in 0..10 {
            list.clear_commands();
            let stats = renderer.frame(&mut list);
            assert_eq!(stats.links, 0);
        }
        assert!(renderer.nodes()[0].neighbors.is_empty());
    }

    #[test]
    fn test_node_colors_follow_activation() {
        let mut renderer = SphereRenderer::new(plain_config());
        renderer.resize(800.0, 600.0, 1.0);
        let mut list = DisplayList::new();
        renderer.frame(&mut list);

        for command in list.circles() {
            if let DrawCommand::Circle { radius, color, .. } = command {
                assert!(*radius >= 2.0 && *radius <= 6.0);
                assert!(color.a >= 0.56 - 1e-6 && color.a <= 0.80 + 1e-6);
            }
        }
    }
}
