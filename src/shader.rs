//! The programmable shading pipeline.
//!
//! A [`Shader`] is a value with three pure stages, run in a fixed order for
//! every triangle of a draw call:
//!
//! 1. **triangle** — once per triangle, may derive aggregate quantities
//!    (such as a face normal) from the raw per-channel input triangles;
//! 2. **vertex** — once per vertex, produces the final output attributes
//!    ("varyings") from the raw channel values and the triangle stage's
//!    output for that vertex;
//! 3. **fragment** — once per covered pixel, with barycentrically
//!    interpolated varyings, computing the pixel color and optionally
//!    adjusting the candidate depth.
//!
//! Output channel 0 is special: its `x`/`y` are the normalized device
//! position in [-1, 1] and its `z` is the initial depth candidate.
//! Stages cannot fail; programs are trusted pure functions.

use crate::math::mat3::Mat3;
use crate::math::vec3::Vec3;
use crate::mesh::{Channel, Triangle, CHANNEL_COUNT};
use crate::texture::{Texture, WrapMode};

/// Per-draw-call constants, shared unmodified by every stage invocation.
#[derive(Clone, Copy, Debug)]
pub struct Uniform {
    pub modelview: Mat3,
    pub light: Vec3,
}

/// A three-stage shader program.
///
/// A conforming program reports `attribute_count() >= 1` and writes every
/// output slot it declares.
pub trait Shader {
    /// Number of output attribute channels the triangle and vertex stages
    /// produce.
    fn attribute_count(&self) -> usize;

    /// Per-triangle stage. `out` has `attribute_count` triangles and
    /// arrives zeroed; unset channels stay zero.
    fn triangle(
        &self,
        uniform: &Uniform,
        out: &mut [Triangle],
        input: &[Triangle; CHANNEL_COUNT],
    );

    /// Per-vertex stage. `out` has `attribute_count` slots, pre-populated
    /// with the triangle stage's values for this vertex, so a normal
    /// derived there can be transformed here.
    fn vertex(&self, uniform: &Uniform, out: &mut [Vec3], input: &[Vec3; CHANNEL_COUNT]);

    /// Per-pixel stage. `depth` holds the interpolated channel-0 z and may
    /// be overwritten. The returned color is nominally in [0, 1] per
    /// component; clamping happens at the buffer write.
    fn fragment(&self, uniform: &Uniform, depth: &mut f32, varying: &[Vec3]) -> Vec3;
}

/// Unit face normal of the raw position triangle; the winding order
/// decides its direction.
fn face_normal(positions: &Triangle) -> Vec3 {
    let [v0, v1, v2] = positions.vertices;
    (v1 - v0).cross(v2 - v0).normalize()
}

/// Ambient + diffuse response of a surface color at a point.
fn lit_color(uniform: &Uniform, position: Vec3, normal: Vec3, color: Vec3) -> Vec3 {
    const AMBIENT_STRENGTH: f32 = 0.2;
    let normal = normal.normalize();
    let ambient = color * AMBIENT_STRENGTH;
    let light_direction = (uniform.light - position).normalize();
    let diffuse = color * normal.dot(light_direction).max(0.0);
    ambient + diffuse
}

/// The stock shading model: modelview-transformed positions, a per-face
/// normal, and ambient + diffuse lighting of the interpolated vertex color.
pub struct DefaultShader;

impl DefaultShader {
    pub const POSITION: usize = 0;
    pub const NORMAL: usize = 1;
    pub const COLOR: usize = 2;
    const ATTRIBUTE_COUNT: usize = 3;
}

impl Shader for DefaultShader {
    fn attribute_count(&self) -> usize {
        Self::ATTRIBUTE_COUNT
    }

    fn triangle(
        &self,
        _uniform: &Uniform,
        out: &mut [Triangle],
        input: &[Triangle; CHANNEL_COUNT],
    ) {
        // One normal per face, written into all three vertex slots.
        let normal = face_normal(&input[Channel::Position as usize]);
        out[Self::NORMAL] = Triangle::new([normal; 3]);
    }

    fn vertex(&self, uniform: &Uniform, out: &mut [Vec3], input: &[Vec3; CHANNEL_COUNT]) {
        out[Self::POSITION] = uniform.modelview * input[Channel::Position as usize];
        out[Self::NORMAL] = uniform.modelview * out[Self::NORMAL];
        out[Self::COLOR] = input[Channel::Color as usize];
    }

    fn fragment(&self, uniform: &Uniform, _depth: &mut f32, varying: &[Vec3]) -> Vec3 {
        lit_color(
            uniform,
            varying[Self::POSITION],
            varying[Self::NORMAL],
            varying[Self::COLOR],
        )
    }
}

/// Like [`DefaultShader`], but the surface color is sampled from a texture
/// at the interpolated texture coordinate (repeat wrap on both axes).
pub struct TexturedShader<'a> {
    texture: &'a Texture,
}

impl<'a> TexturedShader<'a> {
    pub const POSITION: usize = 0;
    pub const NORMAL: usize = 1;
    pub const TEXCOORD: usize = 2;
    const ATTRIBUTE_COUNT: usize = 3;

    pub fn new(texture: &'a Texture) -> Self {
        Self { texture }
    }
}

impl Shader for TexturedShader<'_> {
    fn attribute_count(&self) -> usize {
        Self::ATTRIBUTE_COUNT
    }

    fn triangle(
        &self,
        _uniform: &Uniform,
        out: &mut [Triangle],
        input: &[Triangle; CHANNEL_COUNT],
    ) {
        let normal = face_normal(&input[Channel::Position as usize]);
        out[Self::NORMAL] = Triangle::new([normal; 3]);
    }

    fn vertex(&self, uniform: &Uniform, out: &mut [Vec3], input: &[Vec3; CHANNEL_COUNT]) {
        out[Self::POSITION] = uniform.modelview * input[Channel::Position as usize];
        out[Self::NORMAL] = uniform.modelview * out[Self::NORMAL];
        out[Self::TEXCOORD] = input[Channel::Texcoord as usize];
    }

    fn fragment(&self, uniform: &Uniform, _depth: &mut f32, varying: &[Vec3]) -> Vec3 {
        let uv = varying[Self::TEXCOORD];
        let color = self
            .texture
            .lookup(uv.x, uv.y, [WrapMode::Repeat, WrapMode::Repeat]);
        lit_color(uniform, varying[Self::POSITION], varying[Self::NORMAL], color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_uniform() -> Uniform {
        Uniform {
            modelview: Mat3::IDENTITY,
            light: Vec3::new(0.0, 0.0, -1.0),
        }
    }

    fn quad_facing_camera() -> [Triangle; CHANNEL_COUNT] {
        // Counter-clockwise in x/y at z = 0; the face normal points -z,
        // toward the light.
        let positions = Triangle::new([
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ]);
        let colors = Triangle::new([Vec3::new(1.0, 0.0, 0.0); 3]);
        [positions, colors, Triangle::ZERO]
    }

    #[test]
    fn test_triangle_stage_writes_face_normal_to_all_slots() {
        let shader = DefaultShader;
        let uniform = unit_uniform();
        let mut out = [Triangle::ZERO; 3];
        shader.triangle(&uniform, &mut out, &quad_facing_camera());

        let normal = out[DefaultShader::NORMAL].vertices[0];
        assert_relative_eq!(normal.z, -1.0, epsilon = 1e-6);
        assert_eq!(out[DefaultShader::NORMAL].vertices[1], normal);
        assert_eq!(out[DefaultShader::NORMAL].vertices[2], normal);
        // Unwritten channels stay zeroed.
        assert_eq!(out[DefaultShader::POSITION], Triangle::ZERO);
        assert_eq!(out[DefaultShader::COLOR], Triangle::ZERO);
    }

    #[test]
    fn test_vertex_stage_transforms_position_and_normal() {
        let shader = DefaultShader;
        let uniform = Uniform {
            modelview: Mat3::scaling_uniform(2.0),
            light: Vec3::ZERO,
        };
        let input = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::ZERO,
        ];
        let mut out = [Vec3::ZERO; 3];
        out[DefaultShader::NORMAL] = Vec3::new(0.0, 0.0, -1.0);
        shader.vertex(&uniform, &mut out, &input);

        assert_eq!(out[DefaultShader::POSITION], Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(out[DefaultShader::NORMAL], Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(out[DefaultShader::COLOR], Vec3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_fragment_straight_on_light_saturates() {
        let shader = DefaultShader;
        let uniform = Uniform {
            modelview: Mat3::IDENTITY,
            light: Vec3::new(0.0, 0.0, -1000.0),
        };
        let varying = [
            Vec3::ZERO,                  // position at the origin
            Vec3::new(0.0, 0.0, -1.0),   // facing the light
            Vec3::new(1.0, 0.0, 0.0),    // red
        ];
        let mut depth = 0.0;
        let color = shader.fragment(&uniform, &mut depth, &varying);
        // Ambient 0.2 plus full diffuse.
        assert_relative_eq!(color.x, 1.2, epsilon = 1e-4);
        assert_eq!(color.y, 0.0);
        assert_eq!(color.z, 0.0);
        // The default shader leaves the candidate depth alone.
        assert_eq!(depth, 0.0);
    }

    #[test]
    fn test_fragment_light_behind_surface_is_ambient_only() {
        let shader = DefaultShader;
        let uniform = Uniform {
            modelview: Mat3::IDENTITY,
            light: Vec3::new(0.0, 0.0, 1000.0),
        };
        let varying = [
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let mut depth = 0.0;
        let color = shader.fragment(&uniform, &mut depth, &varying);
        assert_relative_eq!(color.y, 0.2, epsilon = 1e-4);
    }

    #[test]
    fn test_textured_shader_samples_texcoord_varying() {
        // 2x1 texture: red texel then blue texel.
        let texture = Texture::from_pixels(
            2,
            1,
            vec![[255, 0, 0, 255], [0, 0, 255, 255]],
        );
        let shader = TexturedShader::new(&texture);
        let uniform = Uniform {
            modelview: Mat3::IDENTITY,
            light: Vec3::new(0.0, 0.0, 1000.0), // behind: ambient only
        };
        let varying = [
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.75, 0.0, 0.0), // right half: blue
        ];
        let mut depth = 0.0;
        let color = shader.fragment(&uniform, &mut depth, &varying);
        assert_relative_eq!(color.z, 0.2, epsilon = 1e-4);
        assert_relative_eq!(color.x, 0.0, epsilon = 1e-4);
    }
}
