/// Split 0xRRGGBB into sRGB components in [0, 1]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// sRGB transfer function inverse (IEC 61966-2-1)
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// 0xRRGGBB as linear RGB, ready for shading and clear colors
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    hex_to_rgb(hex).map(srgb_to_linear)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb_channels() {
        let rgb = hex_to_rgb(0xff0080);
        assert!((rgb[0] - 1.0).abs() < 1e-6);
        assert!(rgb[1].abs() < 1e-6);
        assert!((rgb[2] - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        let white = hex_to_linear(0xffffff);
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_linear_is_darker_midtones() {
        let mid = srgb_to_linear(0.5);
        assert!((mid - 0.214).abs() < 0.001);
    }
}
