//! Texture storage and texel lookup for fragment shaders.

use std::path::Path;

use crate::math::vec3::Vec3;

/// How a texel coordinate outside the texture is folded back in, chosen
/// independently per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapMode {
    /// Tile the texture (Euclidean modulo, correct for negatives).
    Repeat,
    /// Saturate to the edge texel.
    Clamp,
}

/// A 2D RGBA texture sampled with nearest-neighbor filtering.
pub struct Texture {
    data: Vec<[u8; 4]>,
    width: u32,
    height: u32,
}

impl Texture {
    /// Load a texture from an image file (PNG, JPG, BMP, ...). The format
    /// is detected by the `image` crate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        let data = img.pixels().map(|p| p.0).collect();
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a texture from raw RGBA texels, row-major.
    ///
    /// # Panics
    /// Panics if `data` does not hold exactly `width * height` texels.
    pub fn from_pixels(width: u32, height: u32, data: Vec<[u8; 4]>) -> Self {
        assert_eq!(
            data.len(),
            (width * height) as usize,
            "texel count doesn't match dimensions"
        );
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn wrap(coord: i64, size: u32, mode: WrapMode) -> u32 {
        match mode {
            WrapMode::Repeat => coord.rem_euclid(size as i64) as u32,
            WrapMode::Clamp => coord.clamp(0, size as i64 - 1) as u32,
        }
    }

    /// Fetch the texel at integer coordinates, folding out-of-range
    /// coordinates per the wrap modes. Returns RGB in [0, 1].
    pub fn texel(&self, x: i64, y: i64, wrap: [WrapMode; 2]) -> Vec3 {
        let x = Self::wrap(x, self.width, wrap[0]);
        let y = Self::wrap(y, self.height, wrap[1]);
        let [r, g, b, _a] = self.data[(y * self.width + x) as usize];
        Vec3::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        )
    }

    /// Sample at normalized coordinates in [0, 1], nearest approach: the
    /// fraction is discarded after scaling by the texture size.
    pub fn lookup(&self, u: f32, v: f32, wrap: [WrapMode; 2]) -> Vec3 {
        self.texel(
            (u * self.width as f32) as i64,
            (v * self.height as f32) as i64,
            wrap,
        )
    }
}
