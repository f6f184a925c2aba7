//! Scanline rasterization of a single shaded triangle.
//!
//! The triangle is cut into horizontal bands before any pixel work:
//!
//! 1. **Sort** the three vertices by Y with a fixed swap network.
//! 2. **Slice** the triangle at each vertex Y level, giving two vertical
//!    trapezoids (apex-to-middle and middle-to-base) whose boundary
//!    records carry an x interval plus the barycentric coordinates at the
//!    interval ends.
//! 3. **Cut** each trapezoid against the [-1, 1] viewport. Crossings of
//!    the slanted sides with the vertical borders introduce extra slices,
//!    so every band handed to step 4 lies inside the viewport and the
//!    per-pixel loop needs no clamping at all.
//! 4. **Sweep** pixel rows between consecutive slices. Row endpoints are
//!    interpolated in *integer* arithmetic weighted by remaining row
//!    count: float endpoints here round unevenly between adjacent bands
//!    and leave single-pixel holes. Barycentrics interpolate bilinearly
//!    (down the band, then across the row) in float.
//!
//! Per pixel, the varyings are barycentric combinations of each output
//! channel, the fragment stage runs, and the depth-tested write happens in
//! the frame buffer.

use crate::math::vec3::Vec3;
use crate::mesh::Triangle;
use crate::render::framebuffer::FrameBuffer;
use crate::shader::{Shader, Uniform};

/// A horizontal boundary record: a y level, the x interval the triangle
/// covers there, and the barycentric coordinates at the two interval ends.
#[derive(Clone, Copy, Debug, Default)]
struct Slice {
    y: f32,
    x: [f32; 2],
    bary: [Vec3; 2],
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Clips the trapezoid between `top` and `bottom` against the viewport,
/// writing up to 4 slices into `out` in ascending y order.
///
/// `last` is the y of the slice emitted before this call; candidates at or
/// below it are dropped so bands never repeat or invert. `epsilon` is half
/// a pixel in normalized x, used to snap hairline overshoot back onto the
/// vertical borders — without it adjoining clipped triangles show gaps.
fn cut(out: &mut [Slice], top: &Slice, bottom: &Slice, mut last: f32, epsilon: f32) -> usize {
    let dy = bottom.y - top.y;
    let dx = [bottom.x[0] - top.x[0], bottom.x[1] - top.x[1]];
    // Parametric positions where each side of the trapezoid crosses the
    // x = -1 and x = +1 borders. A side with no horizontal run never
    // crosses; its candidates default to the band ends.
    let mut ty = [
        if dx[0] != 0.0 { (-1.0 - top.x[0]) / dx[0] } else { 0.0 },
        if dx[1] != 0.0 { (-1.0 - top.x[1]) / dx[1] } else { 0.0 },
        if dx[0] != 0.0 { (1.0 - top.x[0]) / dx[0] } else { 1.0 },
        if dx[1] != 0.0 { (1.0 - top.x[1]) / dx[1] } else { 1.0 },
    ];
    // Fixed 5-comparator sorting network.
    if ty[0] > ty[2] {
        ty.swap(0, 2);
    }
    if ty[1] > ty[3] {
        ty.swap(1, 3);
    }
    if ty[0] > ty[1] {
        ty.swap(0, 1);
    }
    if ty[2] > ty[3] {
        ty.swap(2, 3);
    }
    if ty[1] > ty[2] {
        ty.swap(1, 2);
    }

    let mut emitted = 0;
    for t in ty {
        let t = t.clamp(0.0, 1.0);
        let y = lerp(top.y, bottom.y, t).clamp(-1.0, 1.0);
        if y < top.y || y > bottom.y || y <= last {
            continue;
        }

        let mut slice = Slice {
            y,
            ..Slice::default()
        };
        if dy != 0.0 {
            let t = ((y - top.y) / dy).clamp(0.0, 1.0);
            slice.x = [
                lerp(top.x[0], bottom.x[0], t),
                lerp(top.x[1], bottom.x[1], t),
            ];
            slice.bary = [
                top.bary[0].lerp(bottom.bary[0], t),
                top.bary[1].lerp(bottom.bary[1], t),
            ];
        } else {
            // Zero-height band: keep the leftmost candidate on each side.
            for side in 0..2 {
                if top.x[side] < bottom.x[side] {
                    slice.x[side] = top.x[side];
                    slice.bary[side] = top.bary[side];
                } else {
                    slice.x[side] = bottom.x[side];
                    slice.bary[side] = bottom.bary[side];
                }
            }
        }

        // Snap sub-epsilon overshoot onto the border, then collapse an
        // inverted interval.
        if slice.x[0] > 1.0 && slice.x[0] - epsilon < 1.0 {
            slice.x[0] = 1.0;
        }
        if slice.x[1] < -1.0 && slice.x[1] + epsilon > -1.0 {
            slice.x[1] = -1.0;
        }
        if slice.x[0] > slice.x[1] {
            slice.x[0] = slice.x[1];
        }

        // Clip the interval to the borders, re-deriving the end
        // barycentrics at the clip parameter.
        let (sx, ex) = (slice.x[0], slice.x[1]);
        let run = ex - sx;
        let (sb, eb) = (slice.bary[0], slice.bary[1]);
        if sx < -1.0 {
            slice.x[0] = -1.0;
            let t = if run != 0.0 { (-1.0 - sx) / run } else { 0.0 };
            slice.bary[0] = sb.lerp(eb, t);
        }
        if ex > 1.0 {
            slice.x[1] = 1.0;
            let t = if run != 0.0 { (1.0 - sx) / run } else { 1.0 };
            slice.bary[1] = sb.lerp(eb, t);
        }
        if slice.x[0] > 1.0 || slice.x[1] < -1.0 {
            continue;
        }

        last = y;
        out[emitted] = slice;
        emitted += 1;
    }
    emitted
}

/// Rasterize one shaded triangle into the frame buffer.
///
/// `triangle` holds one [`Triangle`] per output attribute channel of the
/// shader; channel 0 carries the normalized device position (x, y in
/// [-1, 1]) and the depth candidate in z. Triangles entirely behind the
/// near plane (all z < -1) or entirely outside the viewport in y are
/// rejected without touching the buffers. There is no far-plane reject:
/// z > 1 draws.
pub fn draw_triangle<S: Shader + ?Sized>(
    fb: &mut FrameBuffer,
    shader: &S,
    uniform: &Uniform,
    triangle: &[Triangle],
) {
    let v = triangle[0].vertices;
    if v[0].z < -1.0 && v[1].z < -1.0 && v[2].z < -1.0 {
        return;
    }

    // Position indices sorted by ascending y; the same ordering indexes
    // every attribute channel below.
    let (mut a, mut b, mut c) = (0usize, 1usize, 2usize);
    if v[a].y > v[b].y {
        std::mem::swap(&mut a, &mut b);
    }
    if v[a].y > v[c].y {
        std::mem::swap(&mut a, &mut c);
    }
    if v[b].y > v[c].y {
        std::mem::swap(&mut b, &mut c);
    }
    if v[a].y > 1.0 || v[c].y < -1.0 {
        return;
    }

    let top = Slice {
        y: v[a].y,
        x: [v[a].x; 2],
        bary: [Vec3::new(1.0, 0.0, 0.0); 2],
    };
    let bottom = Slice {
        y: v[c].y,
        x: [v[c].x; 2],
        bary: [Vec3::new(0.0, 0.0, 1.0); 2],
    };

    // The middle slice pairs the middle vertex with the point where the
    // long edge a->c passes its height. A degenerate flat triangle splits
    // at the midpoint.
    let dcy = v[c].y - v[a].y;
    let bct = if dcy != 0.0 { (v[b].y - v[a].y) / dcy } else { 0.5 };
    let across = bct * (v[c].x - v[a].x) + v[a].x;
    let b_bary = Vec3::new(0.0, 1.0, 0.0);
    let across_bary = Vec3::new(1.0 - bct, 0.0, bct);
    let middle = if across < v[b].x {
        Slice {
            y: v[b].y,
            x: [across, v[b].x],
            bary: [across_bary, b_bary],
        }
    } else {
        Slice {
            y: v[b].y,
            x: [v[b].x, across],
            bary: [b_bary, across_bary],
        }
    };

    let (w, h) = (fb.width(), fb.height());
    let epsilon = 1.0 / w as f32;
    let mut slices = [Slice::default(); 8];
    let mut count = cut(&mut slices, &top, &middle, -2.0, epsilon);
    let last = if count > 0 { slices[count - 1].y } else { -2.0 };
    count += cut(&mut slices[count..], &middle, &bottom, last, epsilon);

    let mut varying = vec![Vec3::ZERO; shader.attribute_count()];
    for i in 1..count {
        let s = &slices[i - 1];
        let e = &slices[i];
        // Map normalized coordinates onto the pixel grid.
        let sy = ((s.y + 1.0) / 2.0 * (h - 1) as f32) as u32;
        let ey = ((e.y + 1.0) / 2.0 * (h - 1) as f32) as u32;
        let sxa = [
            ((s.x[0] + 1.0) / 2.0 * (w - 1) as f32) as u64,
            ((s.x[1] + 1.0) / 2.0 * (w - 1) as f32) as u64,
        ];
        let exa = [
            ((e.x[0] + 1.0) / 2.0 * (w - 1) as f32) as u64,
            ((e.x[1] + 1.0) / 2.0 * (w - 1) as f32) as u64,
        ];
        let rows = (ey - sy).max(1) as u64;
        for y in sy..=ey {
            let down = (y - sy) as u64;
            // Integer-weighted endpoint interpolation; see module docs.
            let sx = (sxa[0] * (rows - down) + exa[0] * down) / rows;
            let ex = (sxa[1] * (rows - down) + exa[1] * down) / rows;
            let cols = (ex - sx).max(1);
            let ty = down as f32 / rows as f32;
            let left = s.bary[0].lerp(e.bary[0], ty);
            let right = s.bary[1].lerp(e.bary[1], ty);
            for x in sx..=ex {
                let tx = (x - sx) as f32 / cols as f32;
                let weights = left.lerp(right, tx);
                for (slot, channel) in varying.iter_mut().zip(triangle) {
                    *slot = Vec3::barycentric(
                        [
                            channel.vertices[a],
                            channel.vertices[b],
                            channel.vertices[c],
                        ],
                        weights,
                    );
                }
                let mut depth = varying[0].z;
                let color = shader.fragment(uniform, &mut depth, &varying);
                fb.set_pixel_with_depth(x as u32, y, depth, color);
            }
        }
    }
}
