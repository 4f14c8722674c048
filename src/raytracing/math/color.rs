use std::ops;

use super::Vec3;

/// Linear RGBA color, one f64 per channel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub channels: [f64; 4],
}

impl Rgba {
    #[inline(always)]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Rgba {
        Rgba {
            channels: [r, g, b, a],
        }
    }

    #[inline(always)]
    pub const fn transparent_black() -> Rgba {
        Rgba::new(0.0, 0.0, 0.0, 0.0)
    }

    #[inline(always)]
    pub const fn black() -> Rgba {
        Rgba::new(0.0, 0.0, 0.0, 1.0)
    }

    pub fn from_rgb(rgb: Vec3, alpha: f64) -> Rgba {
        Rgba::new(rgb.x, rgb.y, rgb.z, alpha)
    }

    pub fn rgb(&self) -> Vec3 {
        Vec3::new(self.channels[0], self.channels[1], self.channels[2])
    }

    pub fn alpha(&self) -> f64 {
        self.channels[3]
    }

    /// Clamps every channel to [0, 1], mapping NaN to 0.
    pub fn clamped(self) -> Rgba {
        let mut channels = self.channels;
        for channel in channels.iter_mut() {
            *channel = if channel.is_nan() {
                0.0
            } else {
                channel.clamp(0.0, 1.0)
            };
        }
        Rgba { channels }
    }

    /// Quantizes to 8 bit per channel, optionally gamma correcting the color channels.
    pub fn to_rgba8(&self, gamma_correction: bool) -> [u8; 4] {
        let clamped = self.clamped();
        let mut result = [0u8; 4];
        for (i, value) in clamped.channels.iter().enumerate() {
            let value = if gamma_correction && i < 3 {
                value.powf(1.0 / 2.2)
            } else {
                *value
            };
            result[i] = (value * 255.0).round() as u8;
        }
        result
    }
}

impl ops::Index<usize> for Rgba {
    type Output = f64;

    #[inline(always)]
    fn index(&self, index: usize) -> &f64 {
        &self.channels[index]
    }
}

impl ops::IndexMut<usize> for Rgba {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.channels[index]
    }
}

#[cfg(test)]
mod tests {
    use super::Rgba;

    #[test]
    fn clamped_maps_nan_to_zero() {
        let color = Rgba::new(f64::NAN, 1.5, -0.2, 0.5).clamped();
        assert_eq!(color, Rgba::new(0.0, 1.0, 0.0, 0.5));
    }

    #[test]
    fn to_rgba8_saturates() {
        assert_eq!(
            Rgba::new(1.0, 0.0, 2.0, 1.0).to_rgba8(false),
            [255, 0, 255, 255]
        );
    }
}
