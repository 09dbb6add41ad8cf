use glam::Vec3;

/// Convert an HSL color (hue in degrees, saturation and lightness in `0..=1`)
/// to sRGB components in `0..=1`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Vec3::new(r + m, g + m, b + m)
}

/// Exact sRGB electro-optical transfer, per channel.
pub fn srgb_to_linear(srgb: Vec3) -> Vec3 {
    fn channel(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    Vec3::new(channel(srgb.x), channel(srgb.y), channel(srgb.z))
}

/// Decode a `0xRRGGBB` literal into linear RGB.
pub fn hex(value: u32) -> Vec3 {
    let r = ((value >> 16) & 0xff) as f32 / 255.0;
    let g = ((value >> 8) & 0xff) as f32 / 255.0;
    let b = (value & 0xff) as f32 / 255.0;
    srgb_to_linear(Vec3::new(r, g, b))
}

/// Four linear-RGB accent colors derived from a single seed.
///
/// The seed picks a base hue; the remaining entries are fixed hue rotations
/// against it, so every generation stays in one family of colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub colors: [Vec3; 4],
}

impl Palette {
    const ENTRIES: [(f32, f32, f32); 4] = [
        (0.0, 0.85, 0.60),
        (40.0, 0.90, 0.65),
        (200.0, 0.90, 0.62),
        (260.0, 0.85, 0.58),
    ];

    pub fn base_hue(seed: f32) -> f32 {
        (seed * 360.0).rem_euclid(360.0)
    }

    pub fn from_seed(seed: f32) -> Self {
        let base = Self::base_hue(seed);
        let colors = Self::ENTRIES
            .map(|(offset, s, l)| srgb_to_linear(hsl_to_rgb(base + offset, s, l)));
        Self { colors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primary_red() {
        let rgb = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((rgb.x - 1.0).abs() < 1e-6);
        assert!(rgb.y.abs() < 1e-6);
        assert!(rgb.z.abs() < 1e-6);
    }

    #[test]
    fn hsl_desaturated_is_gray() {
        let rgb = hsl_to_rgb(123.0, 0.0, 0.42);
        assert!((rgb.x - 0.42).abs() < 1e-6);
        assert!((rgb.y - 0.42).abs() < 1e-6);
        assert!((rgb.z - 0.42).abs() < 1e-6);
    }

    #[test]
    fn hsl_hue_wraps() {
        let a = hsl_to_rgb(420.0, 0.9, 0.6);
        let b = hsl_to_rgb(60.0, 0.9, 0.6);
        assert!((a - b).length() < 1e-5);
    }

    #[test]
    fn linearization_endpoints() {
        assert!(srgb_to_linear(Vec3::ZERO).length() < 1e-6);
        assert!((srgb_to_linear(Vec3::ONE) - Vec3::ONE).length() < 1e-6);
        let mid = srgb_to_linear(Vec3::splat(0.5));
        assert!((mid.x - 0.214).abs() < 1e-3);
    }

    #[test]
    fn hex_decodes_channels() {
        let red = hex(0xff0000);
        assert!((red.x - 1.0).abs() < 1e-6);
        assert!(red.y.abs() < 1e-6);
        let blue = hex(0x0000ff);
        assert!((blue.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn palette_is_deterministic() {
        assert_eq!(Palette::from_seed(0.37), Palette::from_seed(0.37));
        assert_ne!(Palette::from_seed(0.37), Palette::from_seed(0.62));
    }

    #[test]
    fn base_hue_follows_seed() {
        assert!((Palette::base_hue(0.25) - 90.0).abs() < 1e-4);
        assert!((Palette::base_hue(1.25) - 90.0).abs() < 1e-4);
        assert!((Palette::base_hue(-0.25) - 270.0).abs() < 1e-4);
    }

    #[test]
    fn palette_entries_are_distinct() {
        let palette = Palette::from_seed(0.8);
        for i in 0..palette.colors.len() {
            for j in i + 1..palette.colors.len() {
                assert!((palette.colors[i] - palette.colors[j]).length() > 1e-3);
            }
        }
    }
}
