//! A CPU-only scanline triangle rasterizer.
//!
//! Indexed meshes run through a three-stage programmable shading pipeline
//! into caller-owned color and depth buffers. Clipping happens against the
//! normalized [-1, 1] viewport in slice space, scanlines interpolate with
//! a mixed float/integer scheme that leaves no holes between bands, and
//! overlap resolves through a strict nearer-wins depth test.
//!
//! # Quick Start
//!
//! ```ignore
//! use softscan::prelude::*;
//!
//! let (width, height) = (800, 600);
//! let mut color = vec![0u8; (width * height * 4) as usize];
//! let mut depth = vec![f32::INFINITY; (width * height) as usize];
//! let mut fb = FrameBuffer::new(&mut color, &mut depth, width, height);
//!
//! let uniform = Uniform {
//!     modelview: Mat3::rotation_y(-20.0) * Mat3::scaling_uniform(0.5),
//!     light: Vec3::new(1.0, -1.0, -1.0),
//! };
//! draw(&mut fb, &DefaultShader, &uniform, &Mesh::cube());
//! ```

pub mod bitmap;
pub mod math;
pub mod mesh;
pub mod render;
pub mod shader;
pub mod texture;

// Re-export commonly needed types at crate root for convenience
pub use mesh::{Attribute, Channel, LoadError, Mesh, Triangle, CHANNEL_COUNT};
pub use render::{draw, draw_triangle, FrameBuffer};
pub use shader::{DefaultShader, Shader, TexturedShader, Uniform};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use softscan::prelude::*;
/// ```
pub mod prelude {
    // Math
    pub use crate::math::mat3::Mat3;
    pub use crate::math::vec3::Vec3;

    // Mesh
    pub use crate::mesh::{Attribute, Channel, Mesh, Triangle};

    // Shading
    pub use crate::shader::{DefaultShader, Shader, TexturedShader, Uniform};

    // Rendering
    pub use crate::render::{draw, draw_triangle, FrameBuffer};

    // Textures
    pub use crate::texture::{Texture, WrapMode};
}
