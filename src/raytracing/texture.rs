use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::material::{Material, MaterialParams, StandardMaterial};
use super::math::{Rgba, Vec3};
use super::primitive::HitPoint;

const NOISE_TABLE_SIZE: usize = 256;
const NOISE_SCALE: f64 = 10.0;
// keeps the lattice coordinates positive for any reasonable scene
const NOISE_OFFSET: f64 = 10000.0;

/// Value noise on an integer lattice, trilinearly interpolated.
///
/// Tables are generated once from a seed, so the same point always gives the same value.
#[derive(Debug, Clone)]
pub struct LatticeNoise {
    permutation: Vec<usize>,
    values: Vec<f64>,
}

impl LatticeNoise {
    pub fn new(seed: u64) -> LatticeNoise {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut permutation: Vec<usize> = (0..NOISE_TABLE_SIZE).collect();
        permutation.shuffle(&mut rng);
        let values = (0..NOISE_TABLE_SIZE).map(|_| rng.gen::<f64>()).collect();
        LatticeNoise {
            permutation,
            values,
        }
    }

    fn permute(&self, i: i64) -> usize {
        self.permutation[i.rem_euclid(NOISE_TABLE_SIZE as i64) as usize]
    }

    fn lattice(&self, x: i64, y: i64, z: i64) -> f64 {
        let index = self.permute(x + self.permute(y + self.permute(z) as i64) as i64);
        self.values[index]
    }

    /// Noise value in [0, 1] at `point`, sampled with the given frequency.
    pub fn sample(&self, scale: f64, point: Vec3) -> f64 {
        let x = point.x * scale + NOISE_OFFSET;
        let y = point.y * scale + NOISE_OFFSET;
        let z = point.z * scale + NOISE_OFFSET;
        let (ix, iy, iz) = (x.floor(), y.floor(), z.floor());
        let (fx, fy, fz) = (x - ix, y - iy, z - iz);
        let (ix, iy, iz) = (ix as i64, iy as i64, iz as i64);

        let lerp = |a: f64, b: f64, t: f64| a + t * (b - a);
        let corner = |i: i64, j: i64, k: i64| self.lattice(ix + i, iy + j, iz + k);

        let x0 = lerp(corner(0, 0, 0), corner(1, 0, 0), fx);
        let x1 = lerp(corner(0, 1, 0), corner(1, 1, 0), fx);
        let x2 = lerp(corner(0, 0, 1), corner(1, 0, 1), fx);
        let x3 = lerp(corner(0, 1, 1), corner(1, 1, 1), fx);
        let y0 = lerp(x0, x1, fy);
        let y1 = lerp(x2, x3, fy);
        lerp(y0, y1, fz)
    }
}

/// 3D checker pattern, alternating the material colors with a dark tile.
#[derive(Debug, Clone)]
pub struct Checkerboard {
    surface: StandardMaterial,
    scale: Vec3,
}

impl Checkerboard {
    const THRESHOLD: f64 = 1e-4;

    pub fn new(surface: StandardMaterial) -> Checkerboard {
        Checkerboard {
            surface,
            scale: Vec3::new(0.5, 0.5, 0.5),
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Checkerboard {
        self.scale = scale;
        self
    }

    fn is_light_tile(&self, point: Vec3) -> bool {
        let cell = |coordinate: f64, scale: f64| ((coordinate + Self::THRESHOLD) * scale).floor() as i64;
        let parity = cell(point.x, self.scale.x) + cell(point.y, self.scale.y) + cell(point.z, self.scale.z);
        parity.rem_euclid(2) == 0
    }
}

impl Default for Checkerboard {
    fn default() -> Self {
        Checkerboard::new(StandardMaterial::default())
    }
}

impl Material for Checkerboard {
    fn surface(&self) -> &StandardMaterial {
        &self.surface
    }

    fn ambient_color(&self, hit: &HitPoint) -> Rgba {
        if self.is_light_tile(hit.point) {
            self.surface.ambient_color()
        } else {
            Rgba::black()
        }
    }

    fn diffuse_color(&self, hit: &HitPoint) -> Rgba {
        if self.is_light_tile(hit.point) {
            self.surface.diffuse_color()
        } else {
            Rgba::new(0.1, 0.1, 0.1, 1.0)
        }
    }
}

/// Paints the geometric normal, useful to debug transforms.
#[derive(Debug, Clone)]
pub struct SurfaceNormal {
    surface: StandardMaterial,
}

impl Default for SurfaceNormal {
    fn default() -> Self {
        SurfaceNormal {
            surface: StandardMaterial::derive_from(MaterialParams {
                ambient_color: Rgba::new(0.1, 0.1, 0.1, 1.0),
                diffuse_color: Rgba::new(0.1, 0.1, 0.1, 1.0),
                ..Default::default()
            }),
        }
    }
}

impl Material for SurfaceNormal {
    fn surface(&self) -> &StandardMaterial {
        &self.surface
    }

    fn ambient_color(&self, hit: &HitPoint) -> Rgba {
        Rgba::from_rgb((hit.normal + Vec3::one()) * 0.25, 1.0)
    }

    fn diffuse_color(&self, hit: &HitPoint) -> Rgba {
        Rgba::from_rgb((hit.normal + Vec3::one()) * 0.5, 1.0)
    }
}

/// Grey value noise.
#[derive(Debug, Clone)]
pub struct Noise {
    surface: StandardMaterial,
    noise: LatticeNoise,
}

impl Noise {
    pub fn new(surface: StandardMaterial, seed: u64) -> Noise {
        Noise {
            surface,
            noise: LatticeNoise::new(seed),
        }
    }
}

impl Default for Noise {
    fn default() -> Self {
        Noise::new(StandardMaterial::default(), 0)
    }
}

impl Material for Noise {
    fn surface(&self) -> &StandardMaterial {
        &self.surface
    }

    fn ambient_color(&self, hit: &HitPoint) -> Rgba {
        let value = self.noise.sample(NOISE_SCALE, hit.point) * 0.5;
        Rgba::from_rgb(Vec3::one() * value, self.surface.ambient_color().alpha())
    }

    fn diffuse_color(&self, hit: &HitPoint) -> Rgba {
        let value = self.noise.sample(NOISE_SCALE, hit.point);
        Rgba::from_rgb(Vec3::one() * value, self.surface.diffuse_color().alpha())
    }
}

/// Veined stone: a sine band along x, perturbed by lattice noise.
#[derive(Debug, Clone)]
pub struct Marble {
    surface: StandardMaterial,
    noise: LatticeNoise,
    turbulence: f64,
}

impl Marble {
    pub fn new(seed: u64) -> Marble {
        Marble {
            surface: StandardMaterial::derive_from(MaterialParams {
                diffuse_color: Rgba::new(0.31, 0.12, 0.12, 1.0),
                reflection_coefficient: 0.1,
                ..Default::default()
            }),
            noise: LatticeNoise::new(seed),
            turbulence: 4.0,
        }
    }

    fn vein(&self, point: Vec3) -> f64 {
        let noise = self.noise.sample(NOISE_SCALE, point);
        0.5 * (1.0 + (point.x * NOISE_SCALE * 0.5 + self.turbulence * noise).sin())
    }
}

impl Default for Marble {
    fn default() -> Self {
        Marble::new(0)
    }
}

impl Material for Marble {
    fn surface(&self) -> &StandardMaterial {
        &self.surface
    }

    fn diffuse_color(&self, hit: &HitPoint) -> Rgba {
        let vein = self.vein(hit.point);
        let base = self.surface.diffuse_color();
        // veins fade from the base tint toward white
        let rgb = base.rgb() + (Vec3::one() - base.rgb()) * vein;
        Rgba::from_rgb(rgb, base.alpha())
    }
}

/// Concentric rings around the local Z axis, alternating two diffuse colors.
#[derive(Debug, Clone)]
pub struct WoodGrain {
    surface: StandardMaterial,
    ring_color: Rgba,
    ring_width: f64,
}

impl WoodGrain {
    pub fn new(surface: StandardMaterial, ring_color: Rgba, ring_width: f64) -> WoodGrain {
        WoodGrain {
            surface,
            ring_color,
            ring_width,
        }
    }

    fn ring(&self, point: Vec3) -> i64 {
        let radius = (point.x * point.x + point.y * point.y).sqrt();
        ((radius / self.ring_width).floor() as i64).rem_euclid(2)
    }
}

impl Default for WoodGrain {
    fn default() -> Self {
        WoodGrain::new(
            StandardMaterial::derive_from(MaterialParams {
                diffuse_color: Rgba::new(0.31, 0.12, 0.12, 1.0),
                reflection_coefficient: 0.1,
                ..Default::default()
            }),
            Rgba::new(0.55, 0.33, 0.18, 1.0),
            1.0,
        )
    }
}

impl Material for WoodGrain {
    fn surface(&self) -> &StandardMaterial {
        &self.surface
    }

    fn diffuse_color(&self, hit: &HitPoint) -> Rgba {
        let local = hit
            .primitive
            .transform()
            .world_to_local()
            .transform_point(hit.point);
        match self.ring(local) {
            0 => self.surface.diffuse_color(),
            _ => self.ring_color,
        }
    }
}
