/// Perspective projection, facing convention and depth ordering
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// Which sign of projected depth points toward the viewer
///
/// With `scale = focal / (focal + z)`, negative depth magnifies, so the
/// stock convention is [`Facing::NegativeDepth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Facing {
    NegativeDepth,
    PositiveDepth,
}

impl Facing {
    pub fn faces_viewer(self, depth: f32) -> bool {
        match self {
            Facing::NegativeDepth => depth < 0.0,
            Facing::PositiveDepth => depth > 0.0,
        }
    }

    /// Whether walking depths in ascending order paints far nodes first
    pub fn ascending_is_back_to_front(self) -> bool {
        match self {
            Facing::NegativeDepth => false,
            Facing::PositiveDepth => true,
        }
    }
}

impl Default for Facing {
    fn default() -> Self {
        Facing::NegativeDepth
    }
}

/// How nodes are ordered for painting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaintOrder {
    /// Ascending projected depth, whichever end faces the viewer
    #[default]
    Ascending,
    /// Far nodes first, as decided by the [`Facing`] convention
    BackToFront,
}

impl PaintOrder {
    /// Turn an ascending depth order into painting order
    pub fn arrange(self, facing: Facing, mut ascending: Vec<usize>) -> Vec<usize> {
        if self == PaintOrder::BackToFront && !facing.ascending_is_back_to_front() {
            ascending.reverse();
        }
        ascending
    }
}

/// A point after projection onto the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub screen: Point2<f32>,
    /// Un-offset depth of the frame-local point
    pub depth: f32,
    pub scale: f32,
}

/// Simple pinhole perspective centered on an arbitrary screen point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub focal_distance: f32,
    pub center: Point2<f32>,
}

impl Perspective {
    pub fn new(focal_distance: f32, center: Point2<f32>) -> Self {
        Self {
            focal_distance,
            center,
        }
    }

    /// Project a frame-local 3D point to screen space
    pub fn project(&self, point: &Point3<f32>) -> Option<Projected> {
        let denom = self.focal_distance + point.z;

        // Prevent division by near-zero depth values
        if denom.abs() < 1e-6 {
            return None;
        }

        let scale = self.focal_distance / denom;
        Some(Projected {
            screen: Point2::new(
                point.x * scale + self.center.x,
                point.y * scale + self.center.y,
            ),
            depth: point.z,
            scale,
        })
    }
}

/// Indices sorted by ascending depth; equal depths keep their index order
pub fn depth_order<I>(depths: I) -> Vec<usize>
where
    I: IntoIterator<Item = f32>,
{
    let mut keyed: Vec<(usize, f32)> = depths.into_iter().enumerate().collect();
    keyed.sort_by(|a, b| a.1.total_cmp(&b.1));
    keyed.into_iter().map(|(index, _)| index).collect()
}
