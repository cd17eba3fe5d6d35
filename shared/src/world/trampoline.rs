//! Trampoline membrane deformation.
//!
//! The membrane is a flat disc mesh whose vertices keep their reference `(x, z)`
//! forever. Every frame the height of each vertex is recomputed from scratch:
//!
//! ```text
//! distance = sqrt(x² + z²)
//! wave     = sin(distance * radial_frequency - t * speed) * amplitude
//! wind     = noise(x * noise_scale, z * noise_scale, t * noise_time_scale) * noise_amplitude
//! y        = wave + wind
//! ```
//!
//! The result is purely visual. The physics pad stays a rigid cylinder and
//! the ripple never feeds back into contacts.

use bevy::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::noise::NoiseField;
use crate::{SURFACE_RINGS, SURFACE_SEGMENTS, TRAMPOLINE_RADIUS};

/// Coefficients of the membrane ripple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceWaveParams {
    pub radial_frequency: f32,
    pub speed: f32,
    pub amplitude: f32,
    pub noise_scale: f32,
    pub noise_time_scale: f32,
    pub noise_amplitude: f32,
    /// Hard limit on |y| once a value has been computed.
    pub max_displacement: f32,
}

impl Default for SurfaceWaveParams {
    fn default() -> Self {
        Self {
            radial_frequency: 2.0,
            speed: 3.0,
            amplitude: 0.05,
            noise_scale: 2.0,
            noise_time_scale: 0.5,
            noise_amplitude: 0.02,
            max_displacement: 0.5,
        }
    }
}

impl SurfaceWaveParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let coefficients = [
            ("radial_frequency", self.radial_frequency),
            ("speed", self.speed),
            ("amplitude", self.amplitude),
            ("noise_scale", self.noise_scale),
            ("noise_time_scale", self.noise_time_scale),
            ("noise_amplitude", self.noise_amplitude),
        ];
        if let Some((field, value)) = coefficients.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::InvalidSurfaceWave { field, value });
        }
        if !self.max_displacement.is_finite() || self.max_displacement <= 0.0 {
            return Err(ConfigError::InvalidSurfaceWave {
                field: "max_displacement",
                value: self.max_displacement,
            });
        }
        Ok(())
    }

    /// Height of the membrane at reference point `(x, z)` and time `t`.
    ///
    /// Returns the height and whether it had to be repaired. A non-finite sum
    /// drops the noise term first and falls back to 0 if the wave is broken too.
    pub fn displacement(&self, x: f32, z: f32, t: f32, noise: &impl NoiseField) -> (f32, bool) {
        let distance = (x * x + z * z).sqrt();
        let wave = (distance * self.radial_frequency - t * self.speed).sin() * self.amplitude;
        let wind = noise.sample(
            x * self.noise_scale,
            z * self.noise_scale,
            t * self.noise_time_scale,
        ) * self.noise_amplitude;

        let y = wave + wind;
        if !y.is_finite() {
            let fallback = if wave.is_finite() { wave } else { 0.0 };
            return (fallback.clamp(-self.max_displacement, self.max_displacement), true);
        }
        let clamped = y.clamp(-self.max_displacement, self.max_displacement);
        (clamped, clamped != y)
    }
}

/// Shape and resolution of the membrane mesh, plus its ripple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub radius: f32,
    pub segments: u32,
    pub rings: u32,
    pub wave: SurfaceWaveParams,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            radius: TRAMPOLINE_RADIUS,
            segments: SURFACE_SEGMENTS,
            rings: SURFACE_RINGS,
            wave: SurfaceWaveParams::default(),
        }
    }
}

impl SurfaceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ConfigError::InvalidSurfaceRadius(self.radius));
        }
        if self.segments < 3 || self.rings < 1 {
            return Err(ConfigError::InvalidSurfaceResolution {
                segments: self.segments,
                rings: self.rings,
            });
        }
        self.wave.validate()
    }
}

/// Triangle mesh buffers in the layout renderers expect.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    /// A flat disc in the XZ plane facing +Y.
    ///
    /// Vertex 0 is the centre, followed by `rings` concentric rings of
    /// `segments` vertices each, innermost first. Resolution is raised to at
    /// least 3 segments and 1 ring.
    pub fn disc(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(1);
        let ring_vertex = |ring: u32, segment: u32| 1 + (ring - 1) * segments + segment % segments;

        let mut positions = Vec::with_capacity(1 + (segments * rings) as usize);
        positions.push([0.0, 0.0, 0.0]);
        for ring in 1..=rings {
            let r = radius * ring as f32 / rings as f32;
            for segment in 0..segments {
                let angle = std::f32::consts::TAU * segment as f32 / segments as f32;
                positions.push([r * angle.cos(), 0.0, r * angle.sin()]);
            }
        }

        let mut indices = Vec::with_capacity((3 * segments * (2 * rings - 1)) as usize);
        for segment in 0..segments {
            indices.extend([0, ring_vertex(1, segment + 1), ring_vertex(1, segment)]);
        }
        for ring in 1..rings {
            for segment in 0..segments {
                let i0 = ring_vertex(ring, segment);
                let i1 = ring_vertex(ring, segment + 1);
                let o0 = ring_vertex(ring + 1, segment);
                let o1 = ring_vertex(ring + 1, segment + 1);
                indices.extend([i0, o1, o0, i0, i1, o1]);
            }
        }

        let mut mesh = Self {
            normals: vec![[0.0, 1.0, 0.0]; positions.len()],
            positions,
            indices,
        };
        mesh.compute_vertex_normals();
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Area-weighted vertex normals. Vertices with no usable faces point up.
    pub fn compute_vertex_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];
        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let pa = Vec3::from_array(self.positions[a]);
            let pb = Vec3::from_array(self.positions[b]);
            let pc = Vec3::from_array(self.positions[c]);
            // Length of the cross product is twice the face area.
            let face = (pb - pa).cross(pc - pa);
            if !face.is_finite() {
                continue;
            }
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }

        self.normals.resize(self.positions.len(), [0.0, 1.0, 0.0]);
        for (normal, sum) in self.normals.iter_mut().zip(accumulated) {
            *normal = sum.try_normalize().unwrap_or(Vec3::Y).to_array();
        }
    }
}

/// The animated membrane: a disc mesh plus the reference points it was built from.
#[derive(Debug, Clone)]
pub struct TrampolineSurface {
    reference: Vec<Vec2>,
    mesh: SurfaceMesh,
    params: SurfaceWaveParams,
}

impl TrampolineSurface {
    pub fn new(config: &SurfaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::from_mesh(
            SurfaceMesh::disc(config.radius, config.segments, config.rings),
            config.wave,
        )
    }

    /// Captures the reference `(x, z)` of every vertex of an undeformed mesh.
    pub fn from_mesh(mesh: SurfaceMesh, params: SurfaceWaveParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let reference = mesh
            .positions
            .iter()
            .map(|[x, _, z]| Vec2::new(*x, *z))
            .collect();
        Ok(Self {
            reference,
            mesh,
            params,
        })
    }

    /// Rewrites every vertex height for time `t` and refreshes the normals.
    ///
    /// Returns how many vertices needed repair (non-finite or out of range).
    pub fn update(&mut self, t: f32, noise: &impl NoiseField) -> usize {
        let mut repaired = 0;
        for (position, reference) in self.mesh.positions.iter_mut().zip(&self.reference) {
            let (y, fixed) = self.params.displacement(reference.x, reference.y, t, noise);
            *position = [reference.x, y, reference.y];
            repaired += usize::from(fixed);
        }
        self.mesh.compute_vertex_normals();
        repaired
    }

    pub fn params(&self) -> &SurfaceWaveParams {
        &self.params
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.mesh.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.mesh.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.mesh.indices
    }

    pub fn reference_points(&self) -> &[Vec2] {
        &self.reference
    }
}
