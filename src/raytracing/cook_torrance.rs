//! Terms of the Cook-Torrance microfacet specular model.

const GRAZING: f64 = 1e-6;

/// Exact dielectric Fresnel reflectance.
///
/// `c` is the cosine between the normal and the light direction, `eta` the relative index
/// of refraction. When `eta² + c² - 1` is negative every ray is reflected.
pub fn fresnel(c: f64, eta: f64) -> f64 {
    let g_squared = eta * eta + c * c - 1.0;
    if g_squared < 0.0 {
        return 1.0;
    }
    let g = g_squared.sqrt();
    let g_plus_c = g + c;
    let g_minus_c = g - c;
    if g_plus_c.abs() < GRAZING {
        return 1.0;
    }
    let second = (c * g_plus_c - 1.0) / (c * g_minus_c + 1.0);
    0.5 * (g_minus_c / g_plus_c).powi(2) * (1.0 + second * second)
}

/// Beckmann microfacet distribution, `cos_delta` being the cosine between normal and half vector.
pub fn beckmann(cos_delta: f64, roughness: f64) -> f64 {
    let cos_delta = cos_delta.clamp(-1.0, 1.0);
    let cos_squared = cos_delta * cos_delta;
    if cos_squared < GRAZING || roughness.abs() < GRAZING {
        return 0.0;
    }
    let tan_squared = (1.0 - cos_squared) / cos_squared;
    let m_squared = roughness * roughness;
    (-tan_squared / m_squared).exp() / (4.0 * m_squared * cos_squared * cos_squared)
}

/// Geometric attenuation from masking and shadowing of the microfacets, in [0, 1].
pub fn geometry(n_dot_h: f64, n_dot_s: f64, n_dot_v: f64, h_dot_s: f64) -> f64 {
    if h_dot_s.abs() < GRAZING {
        return 0.0;
    }
    let masking = 2.0 * n_dot_h * n_dot_s / h_dot_s;
    let shadowing = 2.0 * n_dot_h * n_dot_v / h_dot_s;
    1f64.min(masking.min(shadowing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn fresnel_at_normal_incidence_matches_f0() {
        // eta = 1.5 gives F0 = ((1.5 - 1) / (1.5 + 1))² = 0.04
        assert!(approx_eq!(f64, fresnel(1.0, 1.5), 0.04, epsilon = 1e-12));
    }

    #[test]
    fn fresnel_grows_toward_grazing() {
        let mut previous = fresnel(1.0, 1.5);
        for step in 1..10 {
            let c = 1.0 - step as f64 * 0.1;
            let value = fresnel(c, 1.5);
            assert!(value >= previous);
            previous = value;
        }
        assert!(approx_eq!(f64, fresnel(0.0, 1.5), 1.0, epsilon = 1e-12));
    }

    #[test]
    fn fresnel_reflects_everything_when_g_is_imaginary() {
        assert_eq!(fresnel(0.1, 0.5), 1.0);
    }

    #[test]
    fn beckmann_peaks_along_the_normal() {
        let roughness = 0.5;
        let peak = beckmann(1.0, roughness);
        assert!(approx_eq!(f64, peak, 1.0, epsilon = 1e-12));
        assert!(beckmann(0.8, roughness) < peak);
    }

    #[test]
    fn beckmann_is_zero_when_degenerate() {
        assert_eq!(beckmann(0.0, 0.5), 0.0);
        assert_eq!(beckmann(0.7, 0.0), 0.0);
        assert!(beckmann(1.0 + 1e-9, 0.3).is_finite());
    }

    #[test]
    fn geometry_is_bounded() {
        assert_eq!(geometry(1.0, 1.0, 1.0, 1.0), 1.0);
        let value = geometry(0.9, 0.1, 0.8, 0.7);
        assert!(approx_eq!(f64, value, 2.0 * 0.9 * 0.1 / 0.7, epsilon = 1e-12));
        assert_eq!(geometry(0.9, 0.5, 0.5, 0.0), 0.0);
    }
}
