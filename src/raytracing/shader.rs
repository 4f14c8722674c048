use super::cook_torrance;
use super::math::{Rgba, Vec3};
use super::primitive::HitPoint;
use super::ray::Ray;
use super::scene::SceneQuery;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderConfig {
    /// Deepest recursion level that still queries the scene.
    pub max_depth: u32,
    /// Returned for rays escaping the scene or exceeding the depth.
    pub background: Rgba,
    /// Reflection rays are spawned above this reflection coefficient.
    pub reflection_threshold: f64,
    /// Refraction rays are spawned above this transparency coefficient.
    pub transparency_threshold: f64,
    pub direct_weight: f64,
    pub reflection_weight: f64,
    pub refraction_weight: f64,
    /// Distance secondary rays start away from the surface.
    pub surface_offset: f64,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        ShaderConfig {
            max_depth: 6,
            background: Rgba::new(0.1, 0.1, 0.1, 1.0),
            reflection_threshold: 0.4,
            transparency_threshold: 0.5,
            direct_weight: 0.8,
            reflection_weight: 0.1,
            refraction_weight: 0.1,
            surface_offset: 1e-3,
        }
    }
}

/// Recursive Whitted style light transport with Cook-Torrance direct lighting.
pub struct Shader<'s, S: SceneQuery> {
    scene: &'s S,
    config: ShaderConfig,
}

// the geometric normal flipped, if needed, to face against `direction`
fn facing(normal: Vec3, direction: Vec3) -> Vec3 {
    if normal.dot(direction) > 0.0 {
        -normal
    } else {
        normal
    }
}

/// Refracted continuation of `ray` through the surface at `hit`, with its medium stack
/// updated. `None` on total internal reflection.
pub fn refracted_ray<'s>(ray: &Ray<'s>, hit: &HitPoint<'s>, offset: f64) -> Option<Ray<'s>> {
    let d = ray.direction.normalize();
    let n = facing(hit.normal, d);

    let inside = ray.crossing(hit.primitive, hit.is_entering);
    let c1 = ray.medium_refraction_index();
    let c2 = inside
        .last()
        .map(|primitive| primitive.material().surface().refraction_index())
        .unwrap_or(1.0);

    let eta = c1 / c2;
    let cos_i = -d.dot(n);
    let sin_t_squared = eta * eta * (1.0 - cos_i * cos_i);
    if sin_t_squared > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin_t_squared).sqrt();
    let direction = (d * eta + n * (eta * cos_i - cos_t)).normalize();
    Some(Ray::with_medium(hit.point - n * offset, direction, inside))
}

impl<'s, S: SceneQuery> Shader<'s, S> {
    pub fn new(scene: &'s S, config: ShaderConfig) -> Shader<'s, S> {
        Shader { scene, config }
    }

    pub fn config(&self) -> &ShaderConfig {
        &self.config
    }

    /// Color seen along `ray`, every channel in [0, 1].
    pub fn shade(&self, ray: &Ray<'s>, depth: u32) -> Rgba {
        if depth > self.config.max_depth {
            return self.config.background;
        }
        let hit = match self.scene.best_hit(ray) {
            Some(hit) => hit,
            None => return self.config.background,
        };
        let surface = hit.material().surface();

        let direct = self.direct_lighting(ray, &hit);

        let mut reflected = Vec3::zero();
        if surface.reflection_coefficient() > self.config.reflection_threshold {
            reflected = self.reflect(ray, &hit, depth).rgb();
        }
        let mut refracted = Vec3::zero();
        if surface.transparency_coefficient() > self.config.transparency_threshold {
            if let Some(continuation) = refracted_ray(ray, &hit, self.config.surface_offset) {
                refracted = self.shade(&continuation, depth + 1).rgb();
            }
        }

        let rgb = direct.rgb() * self.config.direct_weight
            + reflected * (surface.reflection_coefficient() * self.config.reflection_weight)
            + refracted * (surface.transparency_coefficient() * self.config.refraction_weight);
        Rgba::from_rgb(rgb, direct.alpha()).clamped()
    }

    fn direct_lighting(&self, ray: &Ray<'s>, hit: &HitPoint<'s>) -> Rgba {
        let material = hit.material();
        let surface = material.surface();

        let v = (-ray.direction).normalize();
        let n = facing(hit.normal, -v);
        let n_dot_v = n.dot(v);

        let k_d = surface.surface_roughness();
        let k_s = 1.0 - k_d;
        let eta = surface.eta_fresnel();
        let diffuse = material.diffuse_color(hit);

        let mut color = material.ambient_color(hit);
        let origin = hit.point + n * self.config.surface_offset;
        for light in self.scene.lights() {
            let feeler = Ray::new(origin, light.position - origin);
            if self.scene.is_in_shadow(&feeler) {
                continue;
            }
            let s = feeler.direction.normalize();
            let h = (v + s).normalize();
            let n_dot_s = n.dot(s);
            let n_dot_h = n.dot(h).clamp(-1.0, 1.0);
            let h_dot_s = h.dot(s);

            let d_times_g = cook_torrance::beckmann(n_dot_h, surface.surface_roughness())
                * cook_torrance::geometry(n_dot_h, n_dot_s, n_dot_v, h_dot_s);

            let radiance = light.radiance();
            for channel in 0..3 {
                let specular = radiance[channel]
                    * k_s
                    * cook_torrance::fresnel(n_dot_s, eta[channel])
                    * d_times_g
                    / n_dot_v;
                let specular = if specular.is_finite() {
                    specular.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                color[channel] += specular + radiance[channel] * k_d * diffuse[channel];
            }
        }
        color
    }

    fn reflect(&self, ray: &Ray<'s>, hit: &HitPoint<'s>, depth: u32) -> Rgba {
        let n = facing(hit.normal, ray.direction);
        let direction = ray.direction.reflect(n).normalize();
        let reflected = Ray::with_medium(
            hit.point + n * self.config.surface_offset,
            direction,
            ray.inside.clone(),
        );
        self.shade(&reflected, depth + 1)
    }
}
