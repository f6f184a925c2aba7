use std::env;
use std::str::FromStr;

use softscan::bitmap;
use softscan::math::mat3::Mat3;
use softscan::math::vec3::Vec3;
use softscan::mesh::Mesh;
use softscan::render::{draw, FrameBuffer};
use softscan::shader::{DefaultShader, Uniform};

const USAGE: &str = "usage: softscan [-w width] [-h height] [-x degrees] [-y degrees] output.bmp";

struct Params {
    file: String,
    width: u32,
    height: u32,
    rotate_x: f32,
    rotate_y: f32,
}

fn next_value<T: FromStr>(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<T, String> {
    args.next()
        .ok_or_else(|| format!("missing value after {flag}\n{USAGE}"))?
        .parse()
        .map_err(|_| format!("invalid value after {flag}\n{USAGE}"))
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Params, String> {
    let mut args = args.skip(1);
    let mut file = None;
    let mut params = Params {
        file: String::new(),
        width: 800,
        height: 600,
        rotate_x: 25.0,
        rotate_y: -20.0,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-w" => params.width = next_value(&mut args, "-w")?,
            "-h" => params.height = next_value(&mut args, "-h")?,
            "-x" => params.rotate_x = next_value(&mut args, "-x")?,
            "-y" => params.rotate_y = next_value(&mut args, "-y")?,
            _ if arg.starts_with('-') && arg.len() > 1 => return Err(USAGE.to_string()),
            _ if file.is_none() => file = Some(arg),
            _ => return Err(USAGE.to_string()),
        }
    }

    params.file = file.ok_or_else(|| USAGE.to_string())?;
    Ok(params)
}

fn main() -> Result<(), String> {
    let params = parse_args(env::args())?;

    // The light sits relative to the camera; only the world rotates.
    let light = Vec3::new(1.0, -1.0, -1.0);
    let mut view = Mat3::IDENTITY;
    view = Mat3::rotation_y(params.rotate_y) * view;
    view = Mat3::rotation_x(params.rotate_x) * view;
    let model = Mat3::scaling_uniform(0.5);
    let uniform = Uniform {
        modelview: view * model,
        light,
    };

    let (width, height) = (params.width, params.height);
    let mut color = vec![0u8; (width * height * 4) as usize];
    let mut depth = vec![f32::INFINITY; (width * height) as usize];
    let mut fb = FrameBuffer::new(&mut color, &mut depth, width, height);

    let yellow_box = Mesh::cube().with_flat_color(Vec3::new(1.0, 1.0, 0.0));
    draw(&mut fb, &DefaultShader, &uniform, &yellow_box);
    drop(fb);

    bitmap::save(&params.file, width, height, &color).map_err(|e| e.to_string())
}
