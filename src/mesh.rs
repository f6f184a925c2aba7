//! Indexed mesh model.
//!
//! A [`Mesh`] carries one independent attribute stream per [`Channel`]:
//! positions, colors and texture coordinates each have their own vertex
//! array and their own per-triangle index triples. The streams do not need
//! to agree on vertex counts — a cube can share 8 position vertices while
//! reusing 4 texture-coordinate vertices. A channel without data falls
//! back to a per-channel default vector.

use std::fmt;
use std::path::Path;

use crate::math::vec3::Vec3;

/// Three vertices. Used both as raw per-channel mesh data and as the
/// per-attribute output of the shading stages.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
}

impl Triangle {
    pub const ZERO: Self = Self {
        vertices: [Vec3::ZERO; 3],
    };

    pub const fn new(vertices: [Vec3; 3]) -> Self {
        Self { vertices }
    }

    /// Barycentric combination of the three vertices.
    pub fn at(&self, weights: Vec3) -> Vec3 {
        Vec3::barycentric(self.vertices, weights)
    }
}

/// The closed set of per-vertex attribute streams a mesh can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Position,
    Color,
    Texcoord,
}

pub const CHANNEL_COUNT: usize = 3;

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [Channel::Position, Channel::Color, Channel::Texcoord];
}

/// One attribute stream of a mesh.
///
/// If `indices` is present it must hold exactly one triple per mesh
/// triangle, each index pointing into this channel's own `vertices`. With
/// indices but no vertex array, every lookup yields `default`; without
/// indices, `default` is broadcast to all three vertices of every triangle.
#[derive(Clone, Debug, Default)]
pub struct Attribute {
    pub vertices: Option<Vec<Vec3>>,
    pub indices: Option<Vec<[u32; 3]>>,
    pub default: Vec3,
}

impl Attribute {
    /// A stream that yields the same vector for every vertex of every
    /// triangle.
    pub fn constant(default: Vec3) -> Self {
        Self {
            vertices: None,
            indices: None,
            default,
        }
    }

    /// A fully indexed stream.
    pub fn indexed(vertices: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self {
            vertices: Some(vertices),
            indices: Some(indices),
            default: Vec3::ZERO,
        }
    }

    /// Assembles the three attribute values of triangle `i`.
    fn fetch(&self, i: usize) -> Triangle {
        match &self.indices {
            Some(indices) => {
                let triple = indices[i];
                Triangle::new(triple.map(|index| match &self.vertices {
                    Some(vertices) => vertices[index as usize],
                    None => self.default,
                }))
            }
            None => Triangle::new([self.default; 3]),
        }
    }
}

/// An indexed triangle mesh with one [`Attribute`] per [`Channel`].
#[derive(Clone, Debug)]
pub struct Mesh {
    triangle_count: usize,
    attributes: [Attribute; CHANNEL_COUNT],
}

impl Mesh {
    /// Build a mesh from per-channel attribute streams.
    ///
    /// Every channel that carries an index array must carry exactly
    /// `triangle_count` triples; that invariant is owned by the caller.
    pub fn new(triangle_count: usize, attributes: [Attribute; CHANNEL_COUNT]) -> Self {
        for attribute in &attributes {
            if let Some(indices) = &attribute.indices {
                debug_assert_eq!(
                    indices.len(),
                    triangle_count,
                    "index triples must match the mesh triangle count"
                );
            }
        }
        Self {
            triangle_count,
            attributes,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn attribute(&self, channel: Channel) -> &Attribute {
        &self.attributes[channel as usize]
    }

    /// The three values of one channel for triangle `i`.
    pub fn input_triangle(&self, channel: Channel, i: usize) -> Triangle {
        self.attributes[channel as usize].fetch(i)
    }

    /// All channels of triangle `i`, in [`Channel::ALL`] order. This is the
    /// raw input handed to the shading pipeline.
    pub fn input_triangles(&self, i: usize) -> [Triangle; CHANNEL_COUNT] {
        Channel::ALL.map(|channel| self.input_triangle(channel, i))
    }

    /// A copy of this mesh with the color channel replaced by a single
    /// flat color.
    pub fn with_flat_color(&self, color: Vec3) -> Self {
        let mut mesh = self.clone();
        mesh.attributes[Channel::Color as usize] = Attribute::constant(color);
        mesh
    }

    /// The unit cube: 12 triangles around the origin with rainbow vertex
    /// colors and per-face texture coordinates.
    ///
    /// Position and color literals are homogeneous 4-tuples whose `w` is
    /// discarded by the 3-component vector model.
    pub fn cube() -> Self {
        let positions: Vec<Vec3> = [
            [-1.0, -1.0, -1.0, 1.0],
            [1.0, -1.0, -1.0, 1.0],
            [-1.0, 1.0, -1.0, 1.0],
            [1.0, 1.0, -1.0, 1.0],
            [-1.0, -1.0, 1.0, 1.0],
            [1.0, -1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0, 1.0],
        ]
        .into_iter()
        .map(Vec3::from)
        .collect();
        let position_indices = vec![
            [1, 0, 2], [1, 2, 3], // front
            [3, 2, 6], [3, 6, 7], // bottom
            [7, 6, 4], [7, 4, 5], // back
            [5, 4, 0], [5, 0, 1], // top
            [0, 6, 2], [0, 4, 6], // left
            [3, 5, 1], [3, 7, 5], // right
        ];

        let colors: Vec<Vec3> = [
            [1.0, 0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 1.0],
            [1.0, 1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0, 1.0],
            [1.0, 0.0, 1.0, 1.0],
        ]
        .into_iter()
        .map(Vec3::from)
        .collect();
        let color_indices = vec![
            [1, 0, 2], [1, 2, 3],
            [1, 0, 2], [1, 2, 3],
            [1, 0, 2], [1, 2, 3],
            [1, 0, 2], [1, 2, 3],
            [1, 0, 2], [1, 3, 0],
            [1, 0, 2], [1, 3, 0],
        ];

        let texcoords = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        let texcoord_indices = vec![
            [1, 0, 2], [1, 2, 3],
            [1, 0, 2], [1, 2, 3],
            [2, 3, 1], [2, 1, 0],
            [1, 0, 2], [1, 2, 3],
            [3, 0, 2], [3, 1, 0],
            [0, 3, 1], [0, 2, 3],
        ];

        Self::new(
            12,
            [
                Attribute::indexed(positions, position_indices),
                Attribute::indexed(colors, color_indices),
                Attribute::indexed(texcoords, texcoord_indices),
            ],
        )
    }

    /// Load a mesh from an OBJ file.
    ///
    /// All models in the file are merged. Positions and texture
    /// coordinates keep their independent OBJ index streams; the color
    /// channel defaults to white. Texture coordinates are used only when
    /// every model in the file supplies them.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let (models, _materials) = tobj::load_obj(
            path.as_ref(),
            &tobj::LoadOptions {
                triangulate: true,
                ..Default::default()
            },
        )?;

        let mut positions = Vec::new();
        let mut position_indices = Vec::new();
        let mut texcoords = Vec::new();
        let mut texcoord_indices = Vec::new();
        let all_textured = models.iter().all(|m| !m.mesh.texcoords.is_empty());

        for model in &models {
            let mesh = &model.mesh;
            let base = positions.len() as u32;
            positions.extend(
                mesh.positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2])),
            );
            position_indices.extend(
                mesh.indices
                    .chunks_exact(3)
                    .map(|t| [t[0] + base, t[1] + base, t[2] + base]),
            );
            if all_textured {
                let tex_base = texcoords.len() as u32;
                texcoords.extend(
                    mesh.texcoords
                        .chunks_exact(2)
                        .map(|uv| Vec3::new(uv[0], uv[1], 0.0)),
                );
                texcoord_indices.extend(
                    mesh.texcoord_indices
                        .chunks_exact(3)
                        .map(|t| [t[0] + tex_base, t[1] + tex_base, t[2] + tex_base]),
                );
            }
        }

        let triangle_count = position_indices.len();
        if triangle_count == 0 {
            return Err(LoadError::Empty);
        }

        let texcoord_attribute = if all_textured && texcoord_indices.len() == triangle_count {
            Attribute::indexed(texcoords, texcoord_indices)
        } else {
            Attribute::constant(Vec3::ZERO)
        };

        Ok(Self::new(
            triangle_count,
            [
                Attribute::indexed(positions, position_indices),
                Attribute::constant(Vec3::ONE),
                texcoord_attribute,
            ],
        ))
    }
}

/// Errors from loading mesh files.
#[derive(Debug)]
pub enum LoadError {
    /// The OBJ file could not be opened or parsed.
    Obj(tobj::LoadError),
    /// The file parsed but contained no triangles.
    Empty,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Obj(e) => write!(f, "failed to load OBJ: {e}"),
            LoadError::Empty => write!(f, "mesh file contains no triangles"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Obj(e) => Some(e),
            LoadError::Empty => None,
        }
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Obj(e)
    }
}
