//! The rendering pipeline: frame buffers, the scanline rasterizer core
//! and the per-mesh draw loop.

mod framebuffer;
mod scanline;

pub use framebuffer::FrameBuffer;
pub use scanline::draw_triangle;

use crate::math::vec3::Vec3;
use crate::mesh::{Mesh, Triangle, CHANNEL_COUNT};
use crate::shader::{Shader, Uniform};

/// Draw every triangle of a mesh through the shading pipeline.
///
/// Triangles are processed in mesh order, and that order is observable:
/// the depth test resolves exact ties in favor of the triangle drawn
/// first. For each triangle the per-channel inputs are assembled from the
/// mesh, the triangle stage runs once over zeroed output channels, the
/// vertex stage runs per vertex (seeded with the triangle stage's output
/// for that vertex), and the shaded result goes to [`draw_triangle`].
pub fn draw<S: Shader + ?Sized>(
    fb: &mut FrameBuffer,
    shader: &S,
    uniform: &Uniform,
    mesh: &Mesh,
) {
    let attribute_count = shader.attribute_count();
    let mut shaded = vec![Triangle::ZERO; attribute_count];
    let mut vertex_out = vec![Vec3::ZERO; attribute_count];

    for i in 0..mesh.triangle_count() {
        let input = mesh.input_triangles(i);

        shaded.fill(Triangle::ZERO);
        shader.triangle(uniform, &mut shaded, &input);

        for vertex in 0..3 {
            let raw: [Vec3; CHANNEL_COUNT] =
                std::array::from_fn(|channel| input[channel].vertices[vertex]);
            for (slot, out) in vertex_out.iter_mut().zip(shaded.iter()) {
                *slot = out.vertices[vertex];
            }
            shader.vertex(uniform, &mut vertex_out, &raw);
            for (out, slot) in shaded.iter_mut().zip(vertex_out.iter()) {
                out.vertices[vertex] = *slot;
            }
        }

        draw_triangle(fb, shader, uniform, &shaded);
    }
}
