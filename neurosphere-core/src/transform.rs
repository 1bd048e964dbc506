/// Sphere rotation and the per-frame animation phase
use nalgebra::{Point3, Rotation3, Vector3};

/// Rotation and wave angles carried across frames (in radians)
///
/// Both only grow; trigonometric periodicity does the wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationPhase {
    pub rotation: f32,
    pub wave: f32,
}

impl AnimationPhase {
    pub fn new(rotation: f32, wave: f32) -> Self {
        Self { rotation, wave }
    }

    pub fn zero() -> Self {
        Self {
            rotation: 0.0,
            wave: 0.0,
        }
    }

    /// Advance by delta amounts (in radians)
    pub fn advance(&mut self, rotation_step: f32, wave_step: f32) {
        self.rotation += rotation_step;
        self.wave += wave_step;
    }
}

impl Default for AnimationPhase {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for sphere rotations
pub struct Transform;

impl Transform {
    /// Spin about the vertical axis
    pub fn spin(angle: f32) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), angle)
    }

    /// Tilt about the horizontal axis
    pub fn tilt(angle: f32) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), angle)
    }

    /// Spin by `angle` first, then tilt by `tilt`
    pub fn spin_then_tilt(angle: f32, tilt: f32) -> Rotation3<f32> {
        Self::tilt(tilt) * Self::spin(angle)
    }

    /// Move a sphere point into frame-local coordinates
    pub fn to_local(point: &Point3<f32>, rotation: &Rotation3<f32>) -> Point3<f32> {
        rotation * point
    }
}
