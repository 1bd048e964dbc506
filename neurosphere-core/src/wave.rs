/// Traveling activation wave and its decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    /// Half width in normalized sphere-radius units
    pub half_width: f32,
    /// Multiplicative decay applied every frame, in `[0, 1)`
    pub decay: f32,
}

impl Wave {
    pub fn new(half_width: f32, decay: f32) -> Self {
        Self { half_width, decay }
    }

    /// Horizontal position of the wave front in normalized radius units
    pub fn position(phase: f32) -> f32 {
        phase.sin()
    }

    /// Squared linear falloff around the wave front, in `[0, 1]`
    pub fn intensity(&self, normalized_x: f32, wave_position: f32) -> Option<f32> {
        if !(self.half_width > 0.0) {
            return None;
        }

        let distance = (normalized_x - wave_position).abs();
        if distance < self.half_width {
            let falloff = 1.0 - distance / self.half_width;
            Some(falloff * falloff)
        } else {
            None
        }
    }

    /// Raise `activation` to the wave intensity if larger, then decay it
    pub fn excite(&self, activation: f32, normalized_x: f32, wave_position: f32) -> f32 {
        let raised = match self.intensity(normalized_x, wave_position) {
            Some(intensity) => activation.max(intensity),
            None => activation,
        };
        raised * self.decay
    }
}

/// Express a frame-local x coordinate in sphere-radius units
pub fn normalize(x: f32, radius: f32) -> f32 {
    if radius > f32::EPSILON {
        x / radius
    } else {
        0.0
    }
}
