/// NeuroSphere Core Library - Host-independent sphere visualization logic
///
/// This library places nodes on a Fibonacci sphere, rotates and projects them
/// every frame, excites them with a traveling wave, and emits depth-ordered
/// draw calls to any [`DrawSurface`] the host provides.

pub mod color;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod projection;
pub mod renderer;
pub mod sphere;
pub mod surface;
pub mod transform;
pub mod wave;

// Re-export commonly used types
pub use color::{parse_color, Rgba};
pub use config::{SceneConfig, Style};
pub use error::{ColorError, ConfigError};
pub use frame_loop::FrameLoop;
pub use projection::{depth_order, Facing, PaintOrder, Perspective, Projected};
pub use renderer::{FrameStats, SphereRenderer, Viewport};
pub use sphere::Node;
pub use surface::{DisplayList, DrawCommand, DrawSurface};
pub use transform::{AnimationPhase, Transform};
pub use wave::Wave;
