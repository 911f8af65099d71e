//! RGB color algebra for shading and buffer output.

use crate::Vec3;

/// Linear RGB color. Component-wise arithmetic and scalar multiply come
/// from the underlying vector type.
pub type ColorRGB = Vec3;

/// Tone operation that divides by the largest channel when any channel
/// exceeds 1, keeping the ratios between channels intact.
pub fn max_to_one(color: ColorRGB) -> ColorRGB {
    let max_value = color.x.max(color.y).max(color.z);
    if max_value > 1.0 {
        color / max_value
    } else {
        color
    }
}

/// Pack a color into a little-endian 0RGB pixel word. The alpha byte is
/// left at zero; the presentation surface ignores it.
pub fn pack_rgb(color: ColorRGB) -> u32 {
    let r = (color.x.clamp(0.0, 1.0) * 255.0) as u32;
    let g = (color.y.clamp(0.0, 1.0) * 255.0) as u32;
    let b = (color.z.clamp(0.0, 1.0) * 255.0) as u32;
    (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_to_one_leaves_ldr_colors_alone() {
        let c = ColorRGB::new(0.25, 0.5, 1.0);
        assert_eq!(max_to_one(c), c);
    }

    #[test]
    fn test_max_to_one_range_and_hue() {
        let c = ColorRGB::new(4.0, 2.0, 1.0);
        let toned = max_to_one(c);

        assert!(toned.x <= 1.0 && toned.y <= 1.0 && toned.z <= 1.0);
        assert!(toned.x >= 0.0 && toned.y >= 0.0 && toned.z >= 0.0);

        // Channel ratios survive the rescale
        assert!((toned.x / toned.y - c.x / c.y).abs() < 1e-6);
        assert!((toned.y / toned.z - c.y / c.z).abs() < 1e-6);
    }

    #[test]
    fn test_pack_rgb_layout() {
        assert_eq!(pack_rgb(ColorRGB::new(1.0, 0.0, 0.0)), 0x00FF_0000);
        assert_eq!(pack_rgb(ColorRGB::new(0.0, 1.0, 0.0)), 0x0000_FF00);
        assert_eq!(pack_rgb(ColorRGB::new(0.0, 0.0, 1.0)), 0x0000_00FF);
        assert_eq!(pack_rgb(ColorRGB::ZERO), 0);
    }

    #[test]
    fn test_pack_rgb_clamps_out_of_range() {
        assert_eq!(pack_rgb(ColorRGB::new(2.0, -1.0, 0.5)), 0x00FF_007F);
    }
}
