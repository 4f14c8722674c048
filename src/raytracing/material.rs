use std::fmt;

use super::error::ConfigError;
use super::math::{Rgba, Vec3};
use super::primitive::HitPoint;

/// Surface appearance of a primitive.
///
/// The reflectance parameters always come from a [`StandardMaterial`]; implementors may
/// compute the colors as a function of the hit point (procedural textures).
pub trait Material: fmt::Debug + Send + Sync {
    fn surface(&self) -> &StandardMaterial;

    fn ambient_color(&self, _hit: &HitPoint) -> Rgba {
        self.surface().ambient_color()
    }

    fn diffuse_color(&self, _hit: &HitPoint) -> Rgba {
        self.surface().diffuse_color()
    }
}

/// Plain description of a material, validated by [`StandardMaterial::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParams {
    pub ambient_color: Rgba,
    pub diffuse_color: Rgba,
    /// Reflectance at normal incidence (F0) for each color channel.
    pub fresnel: Vec3,
    pub surface_roughness: f64,
    pub reflection_coefficient: f64,
    pub transparency_coefficient: f64,
    pub refraction_index: f64,
}

impl Default for MaterialParams {
    fn default() -> Self {
        MaterialParams {
            ambient_color: Rgba::new(0.1, 0.1, 0.1, 1.0),
            diffuse_color: Rgba::new(0.5, 0.5, 0.5, 1.0),
            fresnel: Vec3::new(0.95, 0.93, 0.88),
            surface_roughness: 0.5,
            reflection_coefficient: 0.0,
            transparency_coefficient: 0.0,
            refraction_index: 1.0,
        }
    }
}

// Presets from learnwebgl.brown37.net/10_surface_properties/surface_properties_color.html
impl MaterialParams {
    pub fn glass() -> Self {
        MaterialParams {
            ambient_color: Rgba::new(0.1, 0.1, 0.1, 1.0),
            diffuse_color: Rgba::new(0.1, 0.1, 0.1, 1.0),
            fresnel: Vec3::new(0.633, 0.727811, 0.633),
            refraction_index: 1.5,
            transparency_coefficient: 0.9,
            ..Default::default()
        }
    }

    pub fn gold() -> Self {
        MaterialParams {
            ambient_color: Rgba::new(0.24725, 0.2245, 0.0645, 1.0),
            diffuse_color: Rgba::new(0.34615, 0.3143, 0.0903, 1.0),
            fresnel: Vec3::new(0.797357, 0.723991, 0.208006),
            surface_roughness: 0.832,
            reflection_coefficient: 0.7,
            ..Default::default()
        }
    }

    pub fn metal() -> Self {
        MaterialParams {
            ambient_color: Rgba::new(0.25, 0.25, 0.25, 1.0),
            diffuse_color: Rgba::new(0.4, 0.4, 0.4, 1.0),
            fresnel: Vec3::new(0.774597, 0.774597, 0.774597),
            surface_roughness: 0.6,
            reflection_coefficient: 12.8,
            ..Default::default()
        }
    }

    pub fn emerald() -> Self {
        MaterialParams {
            ambient_color: Rgba::new(0.0215, 0.1745, 0.0215, 0.55),
            diffuse_color: Rgba::new(0.07568, 0.61424, 0.07568, 0.55),
            fresnel: Vec3::new(0.633, 0.727811, 0.633),
            surface_roughness: 0.832,
            reflection_coefficient: 0.6,
            refraction_index: 1.602,
            transparency_coefficient: 0.7,
        }
    }

    pub fn sky() -> Self {
        MaterialParams {
            ambient_color: Rgba::new(0.1, 0.18725, 0.1745, 0.8),
            diffuse_color: Rgba::new(0.396, 0.74151, 0.69102, 0.8),
            fresnel: Vec3::new(0.297254, 0.30829, 0.306678),
            ..Default::default()
        }
    }

    /// A matte material of the given color.
    pub fn solid(color: Vec3) -> Self {
        MaterialParams {
            ambient_color: Rgba::from_rgb(color * 0.2, 1.0),
            diffuse_color: Rgba::from_rgb(color, 1.0),
            ..Default::default()
        }
    }
}

/// Cook-Torrance material with solid colors.
///
/// The fresnel reflectance can only be set at construction, the per channel index of
/// refraction derived from it is computed once here.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    ambient_color: Rgba,
    diffuse_color: Rgba,
    fresnel: Vec3,
    eta_fresnel: Vec3,
    surface_roughness: f64,
    reflection_coefficient: f64,
    transparency_coefficient: f64,
    refraction_index: f64,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        StandardMaterial::derive_from(MaterialParams::default())
    }
}

fn check_range(
    parameter: &'static str,
    value: f64,
    valid: bool,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if valid && !value.is_nan() {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(parameter, value, expected))
    }
}

impl StandardMaterial {
    pub fn new(params: MaterialParams) -> Result<StandardMaterial, ConfigError> {
        for channel in 0..3 {
            let f0 = params.fresnel[channel];
            check_range("fresnel", f0, (0.0..1.0).contains(&f0), "a value in [0, 1)")?;
        }
        let roughness = params.surface_roughness;
        check_range(
            "surface roughness",
            roughness,
            (0.0..=1.0).contains(&roughness),
            "a value in [0, 1]",
        )?;
        check_range(
            "reflection coefficient",
            params.reflection_coefficient,
            params.reflection_coefficient >= 0.0,
            "a non negative value",
        )?;
        check_range(
            "transparency coefficient",
            params.transparency_coefficient,
            params.transparency_coefficient >= 0.0,
            "a non negative value",
        )?;
        check_range(
            "refraction index",
            params.refraction_index,
            params.refraction_index >= 1.0,
            "a value of at least 1",
        )?;
        Ok(StandardMaterial::derive_from(params))
    }

    // callers guarantee the parameters are in range
    pub(crate) fn derive_from(params: MaterialParams) -> StandardMaterial {
        let eta = |f0: f64| (1.0 + f0.sqrt()) / (1.0 - f0.sqrt());
        StandardMaterial {
            ambient_color: params.ambient_color,
            diffuse_color: params.diffuse_color,
            fresnel: params.fresnel,
            eta_fresnel: Vec3::new(
                eta(params.fresnel.x),
                eta(params.fresnel.y),
                eta(params.fresnel.z),
            ),
            surface_roughness: params.surface_roughness,
            reflection_coefficient: params.reflection_coefficient,
            transparency_coefficient: params.transparency_coefficient,
            refraction_index: params.refraction_index,
        }
    }

    pub fn glass() -> StandardMaterial {
        StandardMaterial::derive_from(MaterialParams::glass())
    }

    pub fn gold() -> StandardMaterial {
        StandardMaterial::derive_from(MaterialParams::gold())
    }

    pub fn metal() -> StandardMaterial {
        StandardMaterial::derive_from(MaterialParams::metal())
    }

    pub fn emerald() -> StandardMaterial {
        StandardMaterial::derive_from(MaterialParams::emerald())
    }

    pub fn sky() -> StandardMaterial {
        StandardMaterial::derive_from(MaterialParams::sky())
    }

    pub fn ambient_color(&self) -> Rgba {
        self.ambient_color
    }

    pub fn diffuse_color(&self) -> Rgba {
        self.diffuse_color
    }

    pub fn fresnel(&self) -> Vec3 {
        self.fresnel
    }

    pub fn eta_fresnel(&self) -> Vec3 {
        self.eta_fresnel
    }

    pub fn surface_roughness(&self) -> f64 {
        self.surface_roughness
    }

    pub fn reflection_coefficient(&self) -> f64 {
        self.reflection_coefficient
    }

    pub fn transparency_coefficient(&self) -> f64 {
        self.transparency_coefficient
    }

    pub fn refraction_index(&self) -> f64 {
        self.refraction_index
    }
}

impl Material for StandardMaterial {
    fn surface(&self) -> &StandardMaterial {
        self
    }
}
