use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use softscan::math::mat3::Mat3;
use softscan::math::vec3::Vec3;
use softscan::mesh::{Mesh, Triangle};
use softscan::render::{draw, draw_triangle, FrameBuffer};
use softscan::shader::{DefaultShader, Uniform};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn create_buffers() -> (Vec<u8>, Vec<f32>) {
    (
        vec![0u8; (BUFFER_WIDTH * BUFFER_HEIGHT * 4) as usize],
        vec![f32::INFINITY; (BUFFER_WIDTH * BUFFER_HEIGHT) as usize],
    )
}

fn uniform() -> Uniform {
    Uniform {
        modelview: Mat3::IDENTITY,
        light: Vec3::new(1.0, -1.0, -1.0),
    }
}

/// A shaded triangle spanning `scale` of the viewport, with the position,
/// normal and color channels the default shader expects.
fn shaded_triangle(scale: f32) -> [Triangle; 3] {
    [
        Triangle::new([
            Vec3::new(scale, -scale, 0.0),
            Vec3::new(-scale, -scale, 0.0),
            Vec3::new(0.0, scale, 0.0),
        ]),
        Triangle::new([Vec3::new(0.0, 0.0, -1.0); 3]),
        Triangle::new([Vec3::new(1.0, 0.0, 0.0); 3]),
    ]
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");
    let uniform = uniform();

    for (name, triangle) in [
        ("small", shaded_triangle(0.05)),
        ("medium", shaded_triangle(0.4)),
        ("large", shaded_triangle(0.95)),
    ] {
        group.bench_with_input(BenchmarkId::new("scanline", name), &triangle, |b, tri| {
            let (mut color, mut depth) = create_buffers();
            b.iter(|| {
                let mut fb =
                    FrameBuffer::new(&mut color, &mut depth, BUFFER_WIDTH, BUFFER_HEIGHT);
                fb.clear();
                draw_triangle(&mut fb, &DefaultShader, &uniform, black_box(tri));
            });
        });
    }

    group.finish();
}

fn benchmark_cube_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("cube_mesh");
    let mesh = Mesh::cube();
    let uniform = Uniform {
        modelview: Mat3::rotation_x(25.0) * Mat3::rotation_y(-20.0) * Mat3::scaling_uniform(0.5),
        light: Vec3::new(1.0, -1.0, -1.0),
    };

    group.bench_function("draw_12_triangles", |b| {
        let (mut color, mut depth) = create_buffers();
        b.iter(|| {
            let mut fb = FrameBuffer::new(&mut color, &mut depth, BUFFER_WIDTH, BUFFER_HEIGHT);
            fb.clear();
            draw(&mut fb, &DefaultShader, &uniform, black_box(&mesh));
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_cube_mesh);
criterion_main!(benches);
